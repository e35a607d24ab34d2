//! Content domain: field registry, values, validation, content types

pub mod content_type;
pub mod entry;
pub mod field;
pub mod validation;
pub mod value;

pub use content_type::{CommentsOptions, ContentType, PublishingOptions, TypePermissions};
pub use entry::{ContentEntry, ContentPage};
pub use field::{DisplayWidget, EditorWidget, FieldDescriptor, FieldOption, FieldType};
pub use validation::{validate_field, ConstraintError};
pub use value::{FieldValue, FileRef};
