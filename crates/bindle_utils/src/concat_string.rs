/// Concatenate string expressions with a single pre-sized allocation.
#[macro_export]
macro_rules! concat_string {
  () => { String::new() };
  ($($s:expr),+ $(,)?) => {{
    let mut buf = String::with_capacity(0usize $(+ AsRef::<str>::as_ref(&$s).len())+);
    $(buf.push_str(AsRef::<str>::as_ref(&$s));)+
    buf
  }};
}

#[test]
fn test_concat_string() {
  assert_eq!(concat_string!("a", String::from("b"), "c"), "abc");
  assert_eq!(
    concat_string!("require_", "chunk", "$", itoa::Buffer::new().format(2)),
    "require_chunk$2"
  );
}
