use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic per-id point in [-1, 1]^2, used to seed initial placement
/// so reloads keep nodes in familiar spots.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Id token for user-added nodes. Data-derived nodes use their source name
/// as id; user nodes get a generated token so renames never collide.
pub fn user_node_id(counter: u64) -> String {
    format!("user-node-{counter}")
}
