use std::fmt;

use crate::config::CompressorConfig;

/// A fully built compressor invocation: program plus raw arguments.
///
/// No shell is involved when it runs; `Display` only quotes tokens so the
/// rendered line can be pasted into one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// `<bin> [bin_args...] --charset <encoding> --type <type> [--flag...]`
    pub fn build(config: &CompressorConfig) -> Self {
        let mut args = config.bin_args.clone();
        args.push("--charset".into());
        args.push(config.encoding.clone());
        args.push("--type".into());
        args.push(config.content_type.to_string());

        for flag in config.enabled_flags() {
            args.push(format!("--{}", flag.replace('_', "-")));
        }

        Self {
            program: config.bin.clone(),
            args,
        }
    }

    /// Only the `--flag` switches, without option values.
    pub fn flags(&self) -> Vec<&str> {
        self.args
            .iter()
            .map(String::as_str)
            .filter(|a| a.starts_with("--") && *a != "--charset" && *a != "--type")
            .collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(token: &str) -> String {
    if token.is_empty() || token.chars().any(|c| c.is_whitespace() || c == '\'') {
        format!("'{}'", token.replace('\'', r"'\''"))
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentType;

    #[test]
    fn test_default_command() {
        let cmd = CommandLine::build(&CompressorConfig::default());
        assert_eq!(cmd.to_string(), "yui-compressor --charset utf8 --type js");
        assert!(cmd.flags().is_empty());
    }

    #[test]
    fn test_verbose_nomunge_only() {
        let config = CompressorConfig {
            nomunge: true,
            verbose: true,
            ..CompressorConfig::default()
        };
        let cmd = CommandLine::build(&config);
        assert_eq!(cmd.flags(), vec!["--verbose", "--nomunge"]);
        assert!(cmd.to_string().ends_with(" --verbose --nomunge"));
    }

    #[test]
    fn test_all_flags_hyphenated() {
        let config = CompressorConfig {
            line_break: true,
            verbose: true,
            nomunge: true,
            preserve_semi: true,
            disable_optimizations: true,
            ..CompressorConfig::default()
        };
        let cmd = CommandLine::build(&config);
        assert_eq!(
            cmd.flags(),
            vec![
                "--line-break",
                "--verbose",
                "--nomunge",
                "--preserve-semi",
                "--disable-optimizations"
            ]
        );
    }

    #[test]
    fn test_bin_args_come_first() {
        let config = CompressorConfig {
            bin: "java".into(),
            bin_args: vec!["-jar".into(), "/opt/yui compressor.jar".into()],
            encoding: "latin1".into(),
            content_type: ContentType::Css,
            ..CompressorConfig::default()
        };
        let cmd = CommandLine::build(&config);
        assert_eq!(cmd.program, "java");
        assert_eq!(cmd.args[..2], ["-jar", "/opt/yui compressor.jar"]);
        assert_eq!(
            cmd.to_string(),
            "java -jar '/opt/yui compressor.jar' --charset latin1 --type css"
        );
    }
}
