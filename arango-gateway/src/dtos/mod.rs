pub mod documents;

pub use documents::CreateDocumentRequest;
