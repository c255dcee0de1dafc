pub mod local_vector_store;
pub mod pg_vector_store;

pub use local_vector_store::LocalVectorStore;
pub use pg_vector_store::PgVectorStore;
