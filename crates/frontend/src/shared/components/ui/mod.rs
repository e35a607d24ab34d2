pub mod badge;
pub mod button;
pub mod input;
pub mod radio;
pub mod select;
pub mod tags_input;
pub mod textarea;
pub mod toggle;
pub mod upload;

pub use badge::Badge;
pub use button::Button;
pub use input::Input;
pub use radio::{Radio, RadioGroup};
pub use select::Select;
pub use tags_input::TagsInput;
pub use textarea::Textarea;
pub use toggle::Toggle;
pub use upload::Upload;
