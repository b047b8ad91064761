pub mod db;
pub mod public;
mod router;
pub use router::{receive_payload, router};
