/// Unqualified name of `T`, without module path or generic arguments.
///
/// `alloc::vec::Vec<my_crate::Foo>` becomes `Vec`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    struct Wrapper<T>(T);

    #[test]
    fn strips_module_path() {
        assert_eq!(short_type_name::<Plain>(), "Plain");
        assert_eq!(short_type_name::<String>(), "String");
    }

    #[test]
    fn strips_generic_arguments() {
        assert_eq!(short_type_name::<Wrapper<Plain>>(), "Wrapper");
        assert_eq!(short_type_name::<Vec<std::path::PathBuf>>(), "Vec");
    }

    #[test]
    fn primitive_names_pass_through() {
        assert_eq!(short_type_name::<u8>(), "u8");
    }
}
