pub mod composite_loader;
pub mod docx_loader;
pub mod html_loader;
pub mod pdf_loader;

pub use composite_loader::CompositeDocumentLoader;
pub use docx_loader::DocxLoader;
pub use html_loader::HtmlLoader;
pub use pdf_loader::PdfLoader;
