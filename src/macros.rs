/// Builds a [`Mask`](crate::Mask) from a list of attribute type identifiers.
///
/// # Example
/// ```
/// use oasys::attribute::builtin::{TRANSLATION, VELOCITY};
///
/// let signature = oasys::mask![TRANSLATION, VELOCITY];
/// assert!(signature.test(VELOCITY));
/// assert_eq!(signature.len(), 2);
/// ```
#[macro_export]
macro_rules! mask {
    ($($attr:expr),* $(,)?) => {
        $crate::Mask::empty() $(.with($attr))*
    };
}

/// Creates a context with the builtin attribute types and the given systems.
///
/// Builtin systems are not registered,
/// so tests control exactly which systems run.
#[cfg(any(test, feature = "internal-bench"))]
#[macro_export]
macro_rules! context_test {
    ($($id:expr => $system:expr),* $(,)?) => {{
        $crate::test_util::init();

        let mut builder = $crate::context::Builder::without_builtins();
        builder.builtin_attributes();
        $(
            builder.system($id, Box::new($system));
        )*

        builder.build().expect("test context should build")
    }};
}
