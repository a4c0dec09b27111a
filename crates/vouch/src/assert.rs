//! Common assertions over a minimal test-context handle.
//!
//! Every assertion takes a severity marker as its first type parameter:
//! [`Continue`] records the failure and lets the test keep running, [`Abort`]
//! records it and stops the test. The macros exported next to this module
//! (`equal!`, `no_err!`, `is_err!`, `as_err!`) are the usual way in:
//!
//! ```text
//! equal!(Abort, &t, got, want);
//! is_err!(Continue, &t, res.as_ref().err(), Some(&NotFound), "lookup of {key}");
//! ```
//!
//! A trailing format string replaces the default failure message entirely.
//!
//! This file only depends on `std` so that `vouch-installer` can copy it into
//! a crate that does not want `vouch` as a dependency.

use std::any::type_name;
use std::error::Error;
use std::fmt;
use std::panic::Location;

pub mod prelude;

/// The subset of a test context the assertions report through.
pub trait TestingT {
    /// Marks the calling assertion as a helper. `caller` is the user's call
    /// site and is where failures should be attributed.
    fn helper(&self, caller: &'static Location<'static>);

    /// Records a failure; the test keeps running.
    fn error(&self, args: fmt::Arguments<'_>);

    /// Records a failure and stops the test. Must not return.
    fn fatal(&self, args: fmt::Arguments<'_>) -> !;
}

/// Runtime view of a severity marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Continue,
    Abort,
}

mod sealed {
    pub trait Sealed {}
}

/// Controls what an assertion does when it fails.
///
/// Implemented only by [`Continue`] and [`Abort`].
pub trait Param: sealed::Sealed {
    const SEVERITY: Severity;

    fn report<T: TestingT + ?Sized>(t: &T, args: fmt::Arguments<'_>) {
        match Self::SEVERITY {
            Severity::Continue => t.error(args),
            Severity::Abort => t.fatal(args),
        }
    }
}

/// Marks the test as failed and continues its execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct Continue;

/// Marks the test as failed and stops its execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct Abort;

impl sealed::Sealed for Continue {}
impl sealed::Sealed for Abort {}

impl Param for Continue {
    const SEVERITY: Severity = Severity::Continue;
}

impl Param for Abort {
    const SEVERITY: Severity = Severity::Abort;
}

/// Borrowed view of an error whose cause chain can be walked.
pub trait ErrorValue {
    fn as_dyn(&self) -> &(dyn Error + 'static);

    /// Name of the concrete type, as far as it is known statically.
    fn type_name(&self) -> &'static str;
}

impl<E: Error + 'static> ErrorValue for E {
    fn as_dyn(&self) -> &(dyn Error + 'static) {
        self
    }

    fn type_name(&self) -> &'static str {
        type_name::<E>()
    }
}

impl ErrorValue for dyn Error + 'static {
    fn as_dyn(&self) -> &(dyn Error + 'static) {
        self
    }

    fn type_name(&self) -> &'static str {
        "dyn Error"
    }
}

impl ErrorValue for dyn Error + Send + Sync + 'static {
    fn as_dyn(&self) -> &(dyn Error + 'static) {
        self
    }

    fn type_name(&self) -> &'static str {
        "dyn Error + Send + Sync"
    }
}

/// Iterator over an error followed by each of its `source()` causes.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

/// Walks `err` and the errors it wraps, outermost first.
pub fn chain<G: ErrorValue + ?Sized>(err: &G) -> Chain<'_> {
    Chain {
        next: Some(err.as_dyn()),
    }
}

/// Reports whether `target` is in the cause chain of `err`.
///
/// A link matches when it is an `E` and is either the very same value as
/// `target` or equal to it. Two absent errors match each other.
pub fn error_is<G, E>(err: Option<&G>, target: Option<&E>) -> bool
where
    G: ErrorValue + ?Sized,
    E: Error + PartialEq + 'static,
{
    match (err, target) {
        (None, None) => true,
        (Some(err), Some(target)) => chain(err).any(|link| {
            link.downcast_ref::<E>()
                .is_some_and(|link| std::ptr::eq(link, target) || link == target)
        }),
        _ => false,
    }
}

/// Returns the first link in the cause chain of `err` that is an `E`.
pub fn error_as<'a, G, E>(err: Option<&'a G>) -> Option<&'a E>
where
    G: ErrorValue + ?Sized,
    E: Error + 'static,
{
    chain(err?).find_map(|link| link.downcast_ref::<E>())
}

/// Asserts that `got` and `want` are equal.
#[track_caller]
pub fn equal<P, T, V>(t: &T, got: V, want: V, msg: Option<fmt::Arguments<'_>>)
where
    P: Param,
    T: TestingT + ?Sized,
    V: PartialEq + fmt::Debug,
{
    if got != want {
        fail::<P, T>(t, msg, format_args!("\ngot\t{got:?}\nwant\t{want:?}"));
    }
}

/// Asserts that `err` is absent.
#[track_caller]
pub fn no_err<P, T, E>(t: &T, err: Option<&E>, msg: Option<fmt::Arguments<'_>>)
where
    P: Param,
    T: TestingT + ?Sized,
    E: fmt::Display + ?Sized,
{
    if let Some(err) = err {
        fail::<P, T>(t, msg, format_args!("\ngot\t{err}\nwant\tno error"));
    }
}

/// Asserts that [`error_is`] holds for `err` and `target`.
#[track_caller]
pub fn is_err<P, T, G, E>(
    t: &T,
    err: Option<&G>,
    target: Option<&E>,
    msg: Option<fmt::Arguments<'_>>,
) where
    P: Param,
    T: TestingT + ?Sized,
    G: ErrorValue + ?Sized,
    E: Error + PartialEq + 'static,
{
    if !error_is(err, target) {
        fail::<P, T>(
            t,
            msg,
            format_args!(
                "\ngot\t{}\nwant\t{}",
                Shown(err.map(ErrorValue::as_dyn)),
                Shown(target)
            ),
        );
    }
}

/// Asserts that some link in the cause chain of `err` is an `E`, and stores
/// that link in `target`. `target` is left untouched on failure.
#[track_caller]
pub fn as_err<'a, P, T, G, E>(
    t: &T,
    err: Option<&'a G>,
    target: &mut Option<&'a E>,
    msg: Option<fmt::Arguments<'_>>,
) where
    P: Param,
    T: TestingT + ?Sized,
    G: ErrorValue + ?Sized,
    E: Error + 'static,
{
    match error_as::<G, E>(err) {
        Some(found) => *target = Some(found),
        None => fail::<P, T>(
            t,
            msg,
            format_args!(
                "\ngot\t{}\nwant\t{}",
                err.map_or("<none>", ErrorValue::type_name),
                type_name::<E>()
            ),
        ),
    }
}

/// Reports a failure through `t`, with the behaviour selected by `P`.
/// A custom message, when present, replaces the default one.
#[track_caller]
fn fail<P: Param, T: TestingT + ?Sized>(
    t: &T,
    custom: Option<fmt::Arguments<'_>>,
    default: fmt::Arguments<'_>,
) {
    t.helper(Location::caller());
    P::report(t, custom.unwrap_or(default));
}

struct Shown<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for Shown<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("<none>"),
        }
    }
}

/// Asserts that two values are equal.
///
/// `equal!(Marker, t, got, want)` or `equal!(Marker, t, got, want, "fmt", args..)`.
#[macro_export]
macro_rules! equal {
    ($p:ty, $t:expr, $got:expr, $want:expr $(,)?) => {
        $crate::assert::equal::<$p, _, _>($t, $got, $want, ::core::option::Option::None)
    };
    ($p:ty, $t:expr, $got:expr, $want:expr, $($arg:tt)+) => {
        $crate::assert::equal::<$p, _, _>(
            $t,
            $got,
            $want,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}

/// Asserts that an `Option<&E>` error is `None`.
#[macro_export]
macro_rules! no_err {
    ($p:ty, $t:expr, $err:expr $(,)?) => {
        $crate::assert::no_err::<$p, _, _>($t, $err, ::core::option::Option::None)
    };
    ($p:ty, $t:expr, $err:expr, $($arg:tt)+) => {
        $crate::assert::no_err::<$p, _, _>(
            $t,
            $err,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}

/// Asserts that a target error is in the cause chain of an error.
#[macro_export]
macro_rules! is_err {
    ($p:ty, $t:expr, $err:expr, $target:expr $(,)?) => {
        $crate::assert::is_err::<$p, _, _, _>($t, $err, $target, ::core::option::Option::None)
    };
    ($p:ty, $t:expr, $err:expr, $target:expr, $($arg:tt)+) => {
        $crate::assert::is_err::<$p, _, _, _>(
            $t,
            $err,
            $target,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}

/// Asserts that an error of the target's type is in the cause chain of an
/// error, and stores it in the target slot.
#[macro_export]
macro_rules! as_err {
    ($p:ty, $t:expr, $err:expr, $target:expr $(,)?) => {
        $crate::assert::as_err::<$p, _, _, _>($t, $err, $target, ::core::option::Option::None)
    };
    ($p:ty, $t:expr, $err:expr, $target:expr, $($arg:tt)+) => {
        $crate::assert::as_err::<$p, _, _, _>(
            $t,
            $err,
            $target,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}
