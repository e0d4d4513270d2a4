// ── Session / device store ──
//
// Single authoritative in-memory copy of the session, the device set, the
// selected device, and what has been fetched for it. Mutations are pushed
// to subscribers via `watch` channels.

mod cradle_store;
mod stream;

pub use cradle_store::CradleStore;
pub use stream::StatusStream;
