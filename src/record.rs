// Generic record trait for any remotely stored type

use serde::{Serialize, de::DeserializeOwned};
use std::fmt::{Debug, Display};

/// Core trait that any record held in a remote collection must implement
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Server-assigned identifier type
    type Id: Copy + Eq + Debug + Display + Send + Sync + 'static;

    /// Payload without an identifier, used for creation and full updates
    type Draft: Serialize + Clone + Debug + Send + Sync;

    /// Unique identifier for this record
    fn id(&self) -> Self::Id;

    /// Collection name for this record type (e.g., "books")
    fn collection_name() -> &'static str
    where
        Self: Sized;
}
