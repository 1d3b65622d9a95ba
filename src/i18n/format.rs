//! Positional placeholder substitution.

use std::fmt::Display;

/// Replace `{0}`, `{1}`, ... in `template` with `args` in order.
///
/// `{{` and `}}` produce literal braces. Placeholders with no matching
/// argument are left untouched.
pub fn fill(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut digits = String::new();
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    digits.push(d);
                    chars.next();
                }
                let arg = digits
                    .parse::<usize>()
                    .ok()
                    .filter(|_| chars.peek() == Some(&'}'))
                    .and_then(|i| args.get(i));
                match arg {
                    Some(arg) => {
                        chars.next();
                        out.push_str(&arg.to_string());
                    }
                    None => {
                        out.push('{');
                        out.push_str(&digits);
                    }
                }
            }
            other => out.push(other),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_in_order() {
        let s = fill("{0} casos e {1} mortes", &[&100, &5]);
        assert_eq!(s, "100 casos e 5 mortes");
    }

    #[test]
    fn test_fill_out_of_order_and_repeated() {
        let s = fill("{1}/{0}/{1}", &[&"a", &"b"]);
        assert_eq!(s, "b/a/b");
    }

    #[test]
    fn test_fill_missing_arg_left_untouched() {
        let s = fill("em {0} é de {1}", &[&"Bahia"]);
        assert_eq!(s, "em Bahia é de {1}");
    }

    #[test]
    fn test_fill_escaped_braces_and_non_numeric() {
        assert_eq!(fill("{{0}} {x}", &[&1]), "{0} {x}");
    }

    #[test]
    fn test_fill_no_placeholders() {
        assert_eq!(fill("Tchau!", &[]), "Tchau!");
    }
}
