pub mod object_store;
pub mod s3_store;

#[cfg(test)]
pub mod mem_store;
