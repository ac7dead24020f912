pub mod mock_stream;

pub use mock_stream::{MOCK_API_SECRET, MockStream};
