//! Schema path resolution
//!
//! Turns the trail of a scalar leaf into the table it belongs to, its
//! column name and the chain of tables the target depends on.
//!
//! # Example
//!
//! With the default policy (root table `orders`, delimiter `_`, flattening
//! enabled):
//!
//! | Trail | Table | Column | Dependencies |
//! |---|---|---|---|
//! | `$.id` | `orders` | `id` | |
//! | `$.customer.name` | `orders` | `customer_name` | |
//! | `$.items[0].sku` | `items` | `sku` | `orders` |
//! | `$.tags[1]` | `tags` | `@value` | `orders` |

mod resolver;
mod types;

pub use resolver::Resolver;
pub use types::{Resolved, VALUE_FIELD};
