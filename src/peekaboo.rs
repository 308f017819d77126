use std::{
    cell::Cell,
    fmt::Debug,
    ops::{Deref, DerefMut},
};

/// A stack that allows to peek at progressively more elements
pub struct Boo<T> {
    vec: Vec<T>,
    peeked: Cell<usize>,
}

impl<T> Default for Boo<T> {
    fn default() -> Self {
        Boo::from(vec![])
    }
}

impl<T> Boo<T> {
    /// Element under the cursor, without moving it.
    pub fn top(&self) -> Option<&T> {
        let peeked = self.peeked.get();
        self.vec.len().checked_sub(peeked + 1).map(|i| &self.vec[i])
    }

    /// Element under the cursor, moving the cursor one level down.
    pub fn peek(&self) -> Option<&T> {
        let top = self.top()?;
        self.peeked.set(self.peeked.get() + 1);
        Some(top)
    }

    pub fn reset(&self) {
        self.peeked.set(0);
    }
}

/// `Some(())` when `cond` holds, for chaining matches with `?`.
pub fn blink(cond: bool) -> Option<()> {
    cond.then_some(())
}

impl<T> Deref for Boo<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.vec
    }
}

impl<T> DerefMut for Boo<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.vec
    }
}

impl<T> From<Vec<T>> for Boo<T> {
    fn from(value: Vec<T>) -> Self {
        Boo {
            vec: value,
            peeked: Cell::new(0),
        }
    }
}

impl<T: Debug> Debug for Boo<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.vec.fmt(f)
    }
}
