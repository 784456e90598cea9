//! Repository layer: the tenant operations executed against one resolved
//! partition. Every repository is constructed over the store plus a
//! [`crate::partition::PartitionId`] and never sees a raw license key.

pub mod category;
pub mod config_entry;
pub mod operator;
pub mod product;
pub mod sale;
pub mod stock;

pub use category::CategoryRepository;
pub use config_entry::ConfigRepository;
pub use operator::OperatorRepository;
pub use product::{CreateProductRequest, ProductRepository, UpdateProductRequest};
pub use sale::{SaleOutcome, SaleRepository};
pub use stock::StockRepository;
