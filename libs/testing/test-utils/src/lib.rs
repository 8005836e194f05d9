//! Shared test utilities for the storefront crates
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo", default)
//! - `TestDataBuilder`: deterministic ids and names for fixtures
//! - `assertions`: small assertion helpers
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore] // Requires Docker
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!     let category = builder.name("category", "shoes");
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Builder for test data with deterministic values
///
/// Tests that share a name get identical fixtures, so failures are reproducible.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed derived from the test name
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_category");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic id; `n` distinguishes ids within one test.
    pub fn id(&self, n: u8) -> Uuid {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.seed.to_le_bytes());
        bytes[8..].copy_from_slice(&self.seed.to_be_bytes());
        bytes[15] ^= n;
        Uuid::from_bytes(bytes)
    }

    /// Unique resource name, e.g. `test-product-12345-main`
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// assert!(builder.name("product", "main").starts_with("test-product-"));
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// SKU unique to this builder
    pub fn sku(&self, n: u32) -> String {
        format!("SKU-{:X}-{:04}", self.seed & 0xFFFF_FFFF, n)
    }
}

pub mod assertions {
    /// Assert that `prices` is sorted ascending (`asc = true`) or descending.
    pub fn assert_sorted_by_price(prices: &[f64], asc: bool) {
        for pair in prices.windows(2) {
            let ordered = if asc { pair[0] <= pair[1] } else { pair[0] >= pair[1] };
            assert!(ordered, "prices not sorted ({}): {:?}", if asc { "asc" } else { "desc" }, prices);
        }
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
