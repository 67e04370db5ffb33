//! Macros for ergonomic structure declaration.

/// Declare a [`shape`](crate::structure::shape) with `key => structure` pairs.
///
/// Keys are string literals or any expression convertible into a
/// [`ShapeKey`](crate::structure::ShapeKey), such as
/// [`wildcard_key()`](crate::structure::wildcard_key).
///
/// # Example
///
/// ```
/// use storechunk::shape;
/// use storechunk::structure::{array_of, number, string, wildcard_key};
///
/// let settings = shape! {
///     "title" => string(),
///     "tags" => array_of(string()),
///     wildcard_key() => number(),
/// };
/// # let _ = settings;
/// ```
#[macro_export]
macro_rules! shape {
    ($($key:expr => $value:expr),* $(,)?) => {
        {
            let entries: ::std::vec::Vec<(
                $crate::structure::ShapeKey,
                $crate::structure::Structure,
            )> = ::std::vec![
                $((
                    ::std::convert::Into::<$crate::structure::ShapeKey>::into($key),
                    $value,
                )),*
            ];
            $crate::structure::shape(entries)
        }
    };
}
