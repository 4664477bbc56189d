/// Kotlin style scope functions, handy at the end of long iterator chains.
pub trait LetAlso: Sized {
    /// Passes `self` by value into `f` and returns whatever `f` returns.
    fn let_owned<R, F>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }

    /// Passes `self` by reference into `f` and returns whatever `f` returns.
    fn let_ref<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&Self) -> R,
    {
        f(self)
    }

    /// Runs `f` for its side effect and hands `self` back.
    fn also<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        f(&mut self);
        self
    }
}

impl<T> LetAlso for T {}
