mod ui_parameter;

pub use self::ui_parameter::UIParameter;
