//! World save files and the world checksum.
//!
//! Layout (all little-endian):
//!
//! ```text
//! magic     4 bytes  "VETZ"
//! version   u8       WORLD_XFER_VERSION
//! next_id   u32
//! count     u32
//! actor*    id: u32, template: u16-prefixed UTF-8, tracker block
//! ```
//!
//! Actors are written in id order. Loading rebuilds every actor from its
//! template, transfers the tracker block, and only then runs each actor's
//! post-process hook, so the hook sees the whole world in place.

use std::path::Path;

use tracing::{info, warn};
use vetz_core::{
    ExperienceOwner, ObjectId, Result, Snapshot, VetzConfig, VetzError, Xfer, XferCrc, XferLoad, XferSave,
    XferVersion,
};

use crate::components::Actor;
use crate::templates::TemplateRegistry;
use crate::world::GameWorld;

/// File magic for world saves.
pub const SAVE_MAGIC: [u8; 4] = *b"VETZ";

/// Current version of the world block.
///
/// Version history:
/// - 1: next id, actor records
pub const WORLD_XFER_VERSION: XferVersion = 1;

/// Serialize every live actor.
///
/// # Errors
/// Returns [`VetzError::Serialization`] for template names too long to store.
pub fn save_world(world: &GameWorld) -> Result<Vec<u8>> {
    let mut save = XferSave::new();
    let mut magic = SAVE_MAGIC;
    save.xfer_bytes(&mut magic)?;
    let mut version = WORLD_XFER_VERSION;
    save.xfer_version(&mut version, WORLD_XFER_VERSION)?;

    let mut next_id = world.next_id();
    save.xfer_u32(&mut next_id)?;
    let mut count = u32::try_from(world.len())
        .map_err(|_| VetzError::Serialization(format!("too many actors: {}", world.len())))?;
    save.xfer_u32(&mut count)?;

    for actor in world.actors() {
        let mut id = actor.id();
        save.xfer_object_id(&mut id)?;
        let mut template = actor.template_name().to_string();
        save.xfer_string(&mut template)?;
        let mut tracker = *actor.experience_tracker();
        tracker.xfer(&mut save)?;
    }

    let bytes = save.into_bytes();
    info!(actors = world.len(), bytes = bytes.len(), "world saved");
    Ok(bytes)
}

/// Rebuild a world from [`save_world`] output.
///
/// # Errors
/// - [`VetzError::BadMagic`] if `bytes` is not a world save
/// - [`VetzError::UnsupportedVersion`] for saves from a newer build
/// - [`VetzError::UnknownTemplate`] for actors whose type is not registered
/// - [`VetzError::Serialization`] for a zero id counter or invalid or
///   duplicate actor ids
/// - [`VetzError::UnexpectedEof`] / [`VetzError::TrailingBytes`] for truncated
///   or padded input
pub fn load_world(bytes: &[u8], config: &VetzConfig, templates: TemplateRegistry) -> Result<GameWorld> {
    let mut load = XferLoad::new(bytes);
    let mut magic = [0u8; 4];
    load.xfer_bytes(&mut magic)?;
    if magic != SAVE_MAGIC {
        return Err(VetzError::BadMagic(magic));
    }
    let mut version = 0;
    load.xfer_version(&mut version, WORLD_XFER_VERSION)?;

    let mut world = GameWorld::new(config, templates);
    let mut next_id = 0;
    load.xfer_u32(&mut next_id)?;
    if next_id == 0 {
        return Err(VetzError::Serialization("next id in save is the invalid id".into()));
    }
    let mut count = 0;
    load.xfer_u32(&mut count)?;

    for _ in 0..count {
        let mut id = ObjectId::INVALID;
        load.xfer_object_id(&mut id)?;
        if !id.is_valid() || id.raw() >= next_id || world.contains(id) {
            return Err(VetzError::Serialization(format!("bad actor id in save: {id}")));
        }

        let mut name = String::new();
        load.xfer_string(&mut name)?;
        let template = world.templates().require(&name).inspect_err(|_| {
            warn!(actor = %id, template = %name, "save references unregistered template");
        })?;

        let mut actor = Actor::new(id, template);
        actor.xfer(&mut load)?;
        world.restore(actor);
    }
    load.finish()?;

    world.set_next_id(next_id);
    for actor in world.actors_mut() {
        actor.load_post_process()?;
    }

    info!(actors = world.len(), next_id, "world loaded");
    Ok(world)
}

/// Checksum of the state every replica must agree on.
///
/// Covers each actor's id, points, and level in id order; sinks and scalars
/// are deliberately left out.
///
/// # Errors
/// Propagates transfer errors.
pub fn world_crc(world: &GameWorld) -> Result<u32> {
    let mut crc = XferCrc::new();
    for actor in world.actors() {
        actor.crc(&mut crc)?;
    }
    Ok(crc.crc())
}

/// [`save_world`] to a file, replacing it.
///
/// # Errors
/// Returns serialization or I/O errors.
pub fn save_world_to_file(world: &GameWorld, path: &Path) -> Result<()> {
    let bytes = save_world(world)?;
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), "world save written");
    Ok(())
}

/// [`load_world`] from a file.
///
/// # Errors
/// Returns I/O or load errors.
pub fn load_world_from_file(path: &Path, config: &VetzConfig, templates: TemplateRegistry) -> Result<GameWorld> {
    let bytes = std::fs::read(path)?;
    load_world(&bytes, config, templates)
}
