use std::{env, path::PathBuf};

use crate::config::{DawgConfig, parse_offset};
use crate::errors::DawgError;

pub const ENV_DICT: &str = "DAWG_DICT";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandLineConfig {
    pub dict: Option<String>,
    pub encoding: Option<String>,
    pub node_base: Option<String>,
    pub chain_policy: Option<String>,
    pub max_depth: Option<String>,
    pub command: String,
    pub command_args: Vec<String>,
}

impl CommandLineConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut config = CommandLineConfig {
            command: String::from("info"),
            ..CommandLineConfig::default()
        };
        let mut command_set = false;
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            if command_set {
                config.command_args.push(arg.to_string());
                continue;
            }
            let slot = match *arg {
                "--dict" => &mut config.dict,
                "--encoding" => &mut config.encoding,
                "--node-base" => &mut config.node_base,
                "--chain-policy" => &mut config.chain_policy,
                "--max-depth" => &mut config.max_depth,
                other if other.starts_with('-') => {
                    return Err(format!("unknown flag {other}"));
                }
                _ => {
                    config.command = arg.to_string();
                    command_set = true;
                    continue;
                }
            };
            *slot = Some(
                iter.next()
                    .ok_or_else(|| format!("{arg} requires a value"))?
                    .to_string(),
            );
        }
        Ok(config)
    }

    /// Environment configuration overlaid with the global flags.
    pub fn dawg_config(&self) -> Result<DawgConfig, DawgError> {
        let mut config = DawgConfig::from_env()?;
        if let Some(encoding) = &self.encoding {
            config.encoding = encoding.parse()?;
        }
        if let Some(node_base) = &self.node_base {
            config.node_base = parse_offset(node_base)?;
        }
        if let Some(policy) = &self.chain_policy {
            config.chain_policy = policy.parse()?;
        }
        if let Some(depth) = &self.max_depth {
            config.max_depth = depth
                .parse()
                .map_err(|_| DawgError::invalid_input("--max-depth expects an integer"))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// `--dict`, falling back to `DAWG_DICT`.
    pub fn dict_path(&self) -> Option<PathBuf> {
        self.dict
            .clone()
            .or_else(|| env::var(ENV_DICT).ok())
            .map(PathBuf::from)
    }

    pub fn help() -> &'static str {
        "Usage: dawglex [--dict PATH] [--encoding packed|split] [--node-base N]\n\
         \x20              [--chain-policy strict|open] [--max-depth N] <command> [args]\n\
         \n\
         Commands:\n\
         \x20 validate <word>...                      exit 0 iff every word is valid\n\
         \x20 enumerate [--section 1|2|both] [--length N] [--parallel]\n\
         \x20 cross-validate <list> [--exhaustive-len N] [--random-samples N] [--seed N] [--enumerate]\n\
         \x20 rank-encodings <list>\n\
         \x20 info\n\
         \x20 build <word-list> <output> [--suffix-only LIST] [--prefix-only LIST]\n"
    }
}
