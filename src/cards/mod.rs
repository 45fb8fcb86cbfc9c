//! Card system: definitions, instances, registry and the sample catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `House`, `CardKind`, `TokenKind`: Fixed game vocabularies
//! - `CardDefinition`: Static card data and abilities
//! - `CardInstance`: Runtime card state (location, tokens, stun)
//! - `CardRegistry`: Validated definition lookup

pub mod catalog;
pub mod definition;
pub mod house;
pub mod instance;
pub mod registry;

pub use definition::{CardDefinition, CardId};
pub use house::{CardKind, House, ParseNameError, TokenKind};
pub use instance::CardInstance;
pub use registry::{CardRegistry, CatalogError};
