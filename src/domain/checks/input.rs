use std::borrow::Cow;

/// A value that can be fed into a semantic check.
///
/// Absent values (`None`) yield `None` and fail every check that inspects them.
pub trait CheckInput {
    fn as_input(&self) -> Option<Cow<'_, str>>;

    /// Whether the value was entered as text. Address and name checks reject numbers.
    fn is_text(&self) -> bool {
        true
    }
}

impl CheckInput for &str {
    fn as_input(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl CheckInput for String {
    fn as_input(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl CheckInput for &String {
    fn as_input(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl<T: CheckInput> CheckInput for Option<T> {
    fn as_input(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(CheckInput::as_input)
    }

    fn is_text(&self) -> bool {
        self.as_ref().is_none_or(CheckInput::is_text)
    }
}

macro_rules! numeric_input {
    ($($ty:ty),*) => {
        $(
            impl CheckInput for $ty {
                fn as_input(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Owned(self.to_string()))
                }

                fn is_text(&self) -> bool {
                    false
                }
            }
        )*
    };
}

numeric_input!(i32, i64, u8, u16, u32, u64, usize);
