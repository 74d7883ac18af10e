//! Deterministic transfer (save / load / crc) of simulation state.
//!
//! An [`Xfer`] walks an object's fields once and either writes them,
//! reads them back in place, or folds them into a running checksum. Objects
//! implement [`Snapshot`] with a single field walk, so the save layout and
//! the load layout cannot drift apart.
//!
//! Wire rules:
//! - All integers and floats are little-endian.
//! - A version tag is one byte; loading a version newer than the writer's
//!   current version is an error.
//! - Strings are a `u16` length followed by UTF-8 bytes.
//!
//! [`XferCrc`] feeds exactly the bytes [`XferSave`] would write into a
//! CRC-32 (ISO 3309 polynomial), so two replicas with identical state agree
//! on the checksum bit for bit.

use tracing::debug;

use crate::error::{Result, VetzError};
use crate::types::ObjectId;

/// Version tag type written at the head of every versioned block.
pub type XferVersion = u8;

/// What a transfer pass does with the fields it visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XferMode {
    /// Write fields to a byte buffer.
    Save,
    /// Overwrite fields from a byte buffer.
    Load,
    /// Fold fields into a checksum.
    Crc,
}

/// A single pass over an object's serializable fields.
///
/// Implementors provide [`Xfer::xfer_bytes`]; every typed helper is
/// expressed in terms of it.
pub trait Xfer {
    /// The mode of this pass.
    fn mode(&self) -> XferMode;

    /// Transfer a raw block. Save and crc read `data`; load overwrites it.
    ///
    /// # Errors
    /// Load passes fail with [`VetzError::UnexpectedEof`] on short input.
    fn xfer_bytes(&mut self, data: &mut [u8]) -> Result<()>;

    /// Transfer a version tag and reject versions newer than `current`.
    ///
    /// On save, `version` should already hold `current`.
    ///
    /// # Errors
    /// Returns [`VetzError::UnsupportedVersion`] for a newer tag.
    fn xfer_version(&mut self, version: &mut XferVersion, current: XferVersion) -> Result<()> {
        let mut raw = [*version];
        self.xfer_bytes(&mut raw)?;
        *version = raw[0];
        if *version > current {
            return Err(VetzError::UnsupportedVersion {
                found: *version,
                current,
            });
        }
        debug!(version = *version, current, mode = ?self.mode(), "xfer version");
        Ok(())
    }

    /// Transfer an opaque fixed-width block.
    ///
    /// # Errors
    /// See [`Xfer::xfer_bytes`].
    fn xfer_user(&mut self, data: &mut [u8]) -> Result<()> {
        self.xfer_bytes(data)
    }

    /// Transfer a signed 32-bit integer.
    ///
    /// # Errors
    /// See [`Xfer::xfer_bytes`].
    fn xfer_i32(&mut self, value: &mut i32) -> Result<()> {
        let mut raw = value.to_le_bytes();
        self.xfer_bytes(&mut raw)?;
        *value = i32::from_le_bytes(raw);
        Ok(())
    }

    /// Transfer an unsigned 32-bit integer.
    ///
    /// # Errors
    /// See [`Xfer::xfer_bytes`].
    fn xfer_u32(&mut self, value: &mut u32) -> Result<()> {
        let mut raw = value.to_le_bytes();
        self.xfer_bytes(&mut raw)?;
        *value = u32::from_le_bytes(raw);
        Ok(())
    }

    /// Transfer an unsigned 16-bit integer.
    ///
    /// # Errors
    /// See [`Xfer::xfer_bytes`].
    fn xfer_u16(&mut self, value: &mut u16) -> Result<()> {
        let mut raw = value.to_le_bytes();
        self.xfer_bytes(&mut raw)?;
        *value = u16::from_le_bytes(raw);
        Ok(())
    }

    /// Transfer a 32-bit float by its bit pattern.
    ///
    /// # Errors
    /// See [`Xfer::xfer_bytes`].
    fn xfer_real(&mut self, value: &mut f32) -> Result<()> {
        let mut raw = value.to_bits().to_le_bytes();
        self.xfer_bytes(&mut raw)?;
        *value = f32::from_bits(u32::from_le_bytes(raw));
        Ok(())
    }

    /// Transfer an object reference; [`ObjectId::INVALID`] means none.
    ///
    /// # Errors
    /// See [`Xfer::xfer_bytes`].
    fn xfer_object_id(&mut self, id: &mut ObjectId) -> Result<()> {
        self.xfer_u32(&mut id.0)
    }

    /// Transfer a length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns [`VetzError::Serialization`] for strings over `u16::MAX`
    /// bytes or invalid UTF-8 on load.
    fn xfer_string(&mut self, value: &mut String) -> Result<()> {
        let mut len = u16::try_from(value.len())
            .map_err(|_| VetzError::Serialization(format!("string too long: {} bytes", value.len())))?;
        self.xfer_u16(&mut len)?;
        let mut bytes = match self.mode() {
            XferMode::Load => vec![0; usize::from(len)],
            XferMode::Save | XferMode::Crc => value.as_bytes().to_vec(),
        };
        self.xfer_bytes(&mut bytes)?;
        if self.mode() == XferMode::Load {
            *value = String::from_utf8(bytes).map_err(|e| VetzError::Serialization(e.to_string()))?;
        }
        Ok(())
    }
}

/// An object whose state participates in save, load, and crc.
pub trait Snapshot {
    /// Contribute the state that replicas must agree on to a crc pass.
    ///
    /// # Errors
    /// Propagates transfer errors.
    fn crc(&self, xfer: &mut dyn Xfer) -> Result<()>;

    /// Save or load the full persistent state.
    ///
    /// # Errors
    /// Propagates transfer and version errors.
    fn xfer(&mut self, xfer: &mut dyn Xfer) -> Result<()>;

    /// Resolve state that depends on other objects once every object has
    /// been loaded.
    ///
    /// # Errors
    /// Implementation-defined.
    fn load_post_process(&mut self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Writes fields into a growable byte buffer.
#[derive(Debug, Default)]
pub struct XferSave {
    buffer: Vec<u8>,
}

impl XferSave {
    /// Start an empty save pass.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Finish the pass and take the buffer.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl Xfer for XferSave {
    fn mode(&self) -> XferMode {
        XferMode::Save
    }

    fn xfer_bytes(&mut self, data: &mut [u8]) -> Result<()> {
        self.buffer.extend_from_slice(data);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Reads fields back from a byte slice.
#[derive(Debug)]
pub struct XferLoad<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> XferLoad<'a> {
    /// Start a load pass over `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// End the pass, requiring every byte to have been consumed.
    ///
    /// # Errors
    /// Returns [`VetzError::TrailingBytes`] if input is left over.
    pub fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(VetzError::TrailingBytes { remaining }),
        }
    }
}

impl Xfer for XferLoad<'_> {
    fn mode(&self) -> XferMode {
        XferMode::Load
    }

    fn xfer_bytes(&mut self, data: &mut [u8]) -> Result<()> {
        let end = self.offset + data.len();
        let Some(source) = self.data.get(self.offset..end) else {
            return Err(VetzError::UnexpectedEof {
                needed: data.len(),
                offset: self.offset,
                available: self.remaining(),
            });
        };
        data.copy_from_slice(source);
        self.offset = end;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CRC
// ---------------------------------------------------------------------------

/// Folds fields into a CRC-32 (ISO 3309 / ITU-T V.42).
#[derive(Debug, Clone, Copy)]
pub struct XferCrc {
    state: u32,
}

impl XferCrc {
    const POLY: u32 = 0xEDB8_8320;

    /// Start a crc pass.
    #[must_use]
    pub fn new() -> Self {
        Self { state: 0xFFFF_FFFF }
    }

    /// Checksum of everything transferred so far.
    #[must_use]
    pub fn crc(&self) -> u32 {
        !self.state
    }
}

impl Default for XferCrc {
    fn default() -> Self {
        Self::new()
    }
}

impl Xfer for XferCrc {
    fn mode(&self) -> XferMode {
        XferMode::Crc
    }

    fn xfer_bytes(&mut self, data: &mut [u8]) -> Result<()> {
        for &byte in data.iter() {
            self.state ^= u32::from(byte);
            for _ in 0..8 {
                if self.state & 1 == 1 {
                    self.state = (self.state >> 1) ^ Self::POLY;
                } else {
                    self.state >>= 1;
                }
            }
        }
        Ok(())
    }
}
