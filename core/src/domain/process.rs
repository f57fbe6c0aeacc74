//! Process display-name rules.

/// Interpreters whose own name says little about what is listening.
const SCRIPT_HOSTS: &[&str] = &["node", "electron", "python", "Python", "deno", "bun"];

/// Clean up a raw process name as reported by the OS or by `lsof`.
///
/// `lsof` escapes spaces as `\x20`; any remaining backslashes are noise.
pub fn clean_process_name(name: &str) -> String {
    name.replace("\\x20", " ")
        .replace('\\', "")
        .trim()
        .to_string()
}

/// Choose the name shown for a process.
///
/// For script hosts like `node` or `python` the script file name is more
/// useful, so the first non-flag argument's file name wins when present.
pub fn display_name<S: AsRef<str>>(name: &str, args: &[S]) -> String {
    let cleaned = clean_process_name(name);

    if SCRIPT_HOSTS.contains(&cleaned.as_str()) {
        if let Some(arg) = args.get(1).map(AsRef::as_ref) {
            if !arg.starts_with('-') {
                if let Some(file_name) = std::path::Path::new(arg).file_name() {
                    return file_name.to_string_lossy().to_string();
                }
            }
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_process_name() {
        assert_eq!(clean_process_name("Google\\x20Chrome"), "Google Chrome");
        assert_eq!(clean_process_name("  nginx  "), "nginx");
        assert_eq!(clean_process_name("odd\\name"), "oddname");
    }

    #[test]
    fn test_display_name_uses_script_for_hosts() {
        let args = ["node", "/srv/app/server.js", "--port", "3000"];
        assert_eq!(display_name("node", &args), "server.js");

        let args = ["python", "manage.py", "runserver"];
        assert_eq!(display_name("python", &args), "manage.py");
    }

    #[test]
    fn test_display_name_ignores_flags() {
        let args = ["node", "--inspect", "server.js"];
        assert_eq!(display_name("node", &args), "node");
    }

    #[test]
    fn test_display_name_plain_process() {
        let args = ["nginx", "-g", "daemon off;"];
        assert_eq!(display_name("nginx", &args), "nginx");

        let no_args: [&str; 0] = [];
        assert_eq!(display_name("python", &no_args), "python");
    }
}
