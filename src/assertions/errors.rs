use std::fmt::{Debug, Display};

use super::Assertions;
use crate::location::Location;

/// Returns the error as a `T` if it belongs to that category.
///
/// Context added with `anyhow::Context` does not hide the underlying error.
pub fn classify<T>(error: &anyhow::Error) -> Option<&T>
where
    T: Display + Debug + Send + Sync + 'static,
{
    error.downcast_ref::<T>()
}

impl Assertions<'_> {
    /// Runs `body` and expects it to fail with an error equal to `expected`.
    pub fn assert_throws<T, F>(&self, expected: &T, location: Location, body: F)
    where
        T: PartialEq + Display + Debug + Send + Sync + 'static,
        F: FnOnce() -> anyhow::Result<()>,
    {
        let err = match body() {
            Ok(()) => return self.fail("body completed successfully", location),
            Err(err) => err,
        };

        match classify::<T>(&err) {
            Some(actual) if actual == expected => {}
            Some(actual) => self.fail(
                format!("assert_throws failed: ({actual:?}) is not equal to ({expected:?})"),
                location,
            ),
            None => self.fail(format!("unexpected error thrown: {err:#}"), location),
        }
    }

    /// Evaluates `expression` and expects it to fail with a `T` accepted by
    /// `predicate`.
    pub fn assert_throws_matching<T, R, F, P>(
        &self,
        expression: F,
        location: Location,
        predicate: P,
    ) where
        T: Display + Debug + Send + Sync + 'static,
        R: Debug,
        F: FnOnce() -> anyhow::Result<R>,
        P: FnOnce(&T) -> bool,
    {
        let err = match expression() {
            Ok(result) => {
                return self.fail(
                    format!("body completed successfully: {result:?}"),
                    location,
                )
            }
            Err(err) => err,
        };

        match classify::<T>(&err) {
            Some(actual) => {
                if !predicate(actual) {
                    self.fail("Error handler returned false", location);
                }
            }
            None => self.fail(format!("unexpected error thrown: {err:#}"), location),
        }
    }

    /// Unwraps `optional` and hands the value to `body`.
    ///
    /// `body` is never invoked for `None`.
    pub fn assert_some<T, F>(&self, optional: Option<T>, location: Location, body: F)
    where
        F: FnOnce(T) -> anyhow::Result<()>,
    {
        let Some(value) = optional else {
            return self.fail("Unexpected nil value", location);
        };
        if let Err(err) = body(value) {
            self.fail(format!("Unexpected error {err:#}"), location);
        }
    }
}
