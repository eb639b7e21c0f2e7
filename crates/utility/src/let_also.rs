/// Kotlin-style scope function for pipelining a value through a closure
/// without breaking a method chain.
pub trait LetAlso: Sized {
    fn let_owned<R, F>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T: Sized> LetAlso for T {}
