use std::fmt::Debug;

pub trait ErrorStringExt<T> {
    /// Turns any error into a `String`, prefixed with `msg`.
    fn err_to_string(self, msg: &str) -> Result<T, String>;
}

impl<T, E: Debug> ErrorStringExt<T> for Result<T, E> {
    fn err_to_string(self, msg: &str) -> Result<T, String> {
        self.map_err(|err| format!("{msg}: {err:?}"))
    }
}
