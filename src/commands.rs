use std::{fs, io::Write, path::PathBuf};

use serde_json::{Map, Value, json};
use tracing::warn;

use crate::{
    DawgError,
    builder::DawgBuilder,
    cli::CommandLineConfig,
    config::DawgConfig,
    crossval::{CrossValidationOptions, Lexicon, cross_validate, rank_encodings},
    file::{DawgFile, Section},
    query::QueryEngine,
};

const ERR_PREFIX: &str = "cli";

/// Flags that consume the following argument.
const VALUE_FLAGS: &[&str] = &[
    "--section",
    "--length",
    "--exhaustive-len",
    "--random-samples",
    "--seed",
    "--suffix-only",
    "--prefix-only",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// The command ran but its answer was negative (e.g. a word was rejected).
    Rejected,
}

impl CommandStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            CommandStatus::Success => 0,
            CommandStatus::Rejected => 1,
        }
    }
}

pub fn run(cli: &CommandLineConfig, out: &mut dyn Write) -> Result<CommandStatus, DawgError> {
    let config = cli.dawg_config()?;
    let args = &cli.command_args;
    match cli.command.as_str() {
        "build" => run_build(&config, args, out),
        "rank-encodings" => run_rank_encodings(cli, &config, args, out),
        "validate" | "enumerate" | "cross-validate" | "info" => {
            let file = DawgFile::open(dict_path(cli)?, config)?;
            let engine = QueryEngine::new(&file);
            match cli.command.as_str() {
                "validate" => run_validate(&engine, args, out),
                "enumerate" => run_enumerate(&engine, args, out),
                "cross-validate" => run_cross_validate(&engine, args, out),
                _ => run_info(&engine, out),
            }
        }
        other => Err(invalid(format!("unknown command {other}"))),
    }
}

fn run_validate(
    engine: &QueryEngine<'_>,
    args: &[String],
    out: &mut dyn Write,
) -> Result<CommandStatus, DawgError> {
    let words = positionals(args);
    if words.is_empty() {
        return Err(invalid("validate requires at least one word"));
    }
    let mut all_valid = true;
    for word in words {
        let verdict = engine.check(word);
        all_valid &= verdict.is_word();
        writeln!(out, "{word}\t{}", verdict.label())?;
    }
    Ok(if all_valid {
        CommandStatus::Success
    } else {
        CommandStatus::Rejected
    })
}

fn run_enumerate(
    engine: &QueryEngine<'_>,
    args: &[String],
    out: &mut dyn Write,
) -> Result<CommandStatus, DawgError> {
    let sections = parse_sections(value(args, "--section").as_deref())?;
    let length = parse_optional_usize(args, "--length")?;
    let keep = |word: &str| length.is_none_or(|len| word.len() == len);
    if has_flag(args, "--parallel") {
        for word in engine.par_enumerate(&sections) {
            if keep(&word) {
                writeln!(out, "{word}")?;
            }
        }
    } else {
        let mut words = engine.enumerate_sections(&sections);
        for word in words.by_ref() {
            if keep(&word) {
                writeln!(out, "{word}")?;
            }
        }
        if words.faults() > 0 {
            warn!(faults = words.faults(), "enumeration skipped malformed branches");
        }
    }
    Ok(CommandStatus::Success)
}

fn run_cross_validate(
    engine: &QueryEngine<'_>,
    args: &[String],
    out: &mut dyn Write,
) -> Result<CommandStatus, DawgError> {
    let lexicon = load_lexicon(args)?;
    let options = parse_cross_options(args)?;
    let report = cross_validate(engine, &lexicon, &options);
    let mut object = Map::new();
    object.insert("command".into(), Value::String("cross-validate".into()));
    object.insert("skipped_entries".into(), json!(lexicon.skipped()));
    object.insert("options".into(), to_value(&options)?);
    object.insert("report".into(), to_value(&report)?);
    emit(out, object)
}

fn run_rank_encodings(
    cli: &CommandLineConfig,
    config: &DawgConfig,
    args: &[String],
    out: &mut dyn Write,
) -> Result<CommandStatus, DawgError> {
    let lexicon = load_lexicon(args)?;
    let options = parse_cross_options(args)?;
    let bytes = fs::read(dict_path(cli)?)?;
    let ranking = rank_encodings(&bytes, config, &lexicon, &options);
    let mut object = Map::new();
    object.insert("command".into(), Value::String("rank-encodings".into()));
    object.insert("ranking".into(), to_value(&ranking)?);
    emit(out, object)
}

fn run_info(engine: &QueryEngine<'_>, out: &mut dyn Write) -> Result<CommandStatus, DawgError> {
    let table = engine.prefix().table();
    let mut object = Map::new();
    object.insert("command".into(), Value::String("info".into()));
    object.insert("summary".into(), to_value(&engine.file().summary())?);
    object.insert(
        "section2_top_chains".into(),
        json!(table.chain_count()),
    );
    object.insert(
        "section2_first_letters".into(),
        json!(table.all().len()),
    );
    emit(out, object)
}

fn run_build(
    config: &DawgConfig,
    args: &[String],
    out: &mut dyn Write,
) -> Result<CommandStatus, DawgError> {
    let positional = positionals(args);
    let [input, output] = positional.as_slice() else {
        return Err(invalid("build requires <word-list> <output>"));
    };
    let lexicon = Lexicon::from_path(input)?;
    let mut builder = DawgBuilder::with_config(config).words(lexicon.iter())?;
    let mut skipped = lexicon.skipped();
    if let Some(path) = value(args, "--suffix-only") {
        let extra = Lexicon::from_path(path)?;
        skipped += extra.skipped();
        builder = builder.suffix_words(extra.iter())?;
    }
    if let Some(path) = value(args, "--prefix-only") {
        let extra = Lexicon::from_path(path)?;
        skipped += extra.skipped();
        builder = builder.prefix_words(extra.iter())?;
    }
    let bytes = builder.build()?;
    fs::write(output, &bytes)?;
    let mut object = Map::new();
    object.insert("command".into(), Value::String("build".into()));
    object.insert("output".into(), json!(output));
    object.insert("words".into(), json!(lexicon.len()));
    object.insert("skipped_entries".into(), json!(skipped));
    object.insert("bytes".into(), json!(bytes.len()));
    emit(out, object)
}

fn load_lexicon(args: &[String]) -> Result<Lexicon, DawgError> {
    let path = positionals(args)
        .first()
        .copied()
        .ok_or_else(|| invalid("missing <reference-list>"))?;
    Lexicon::from_path(path)
}

fn parse_cross_options(args: &[String]) -> Result<CrossValidationOptions, DawgError> {
    let mut options = CrossValidationOptions::default();
    if let Some(len) = parse_optional_usize(args, "--exhaustive-len")? {
        options.exhaustive_max_len = len;
    }
    if let Some(count) = parse_optional_usize(args, "--random-samples")? {
        options.random_samples = count;
    }
    if let Some(seed) = value(args, "--seed") {
        options.seed = seed
            .parse()
            .map_err(|_| invalid("--seed expects an integer"))?;
    }
    options.check_enumeration = has_flag(args, "--enumerate");
    Ok(options)
}

fn parse_sections(value: Option<&str>) -> Result<Vec<Section>, DawgError> {
    match value {
        None | Some("both") => Ok(Section::BOTH.to_vec()),
        Some(other) => Ok(vec![other.parse()?]),
    }
}

fn dict_path(cli: &CommandLineConfig) -> Result<PathBuf, DawgError> {
    cli.dict_path()
        .ok_or_else(|| invalid("no dictionary given (use --dict or DAWG_DICT)"))
}

fn parse_optional_usize(args: &[String], flag: &str) -> Result<Option<usize>, DawgError> {
    value(args, flag)
        .map(|raw| {
            raw.parse::<usize>()
                .map_err(|_| invalid(format!("{flag} expects an integer")))
        })
        .transpose()
}

fn value(args: &[String], flag: &str) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            return iter.next().cloned();
        }
    }
    None
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut result = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            result.push(arg.as_str());
        }
    }
    result
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, DawgError> {
    serde_json::to_value(value)
        .map_err(|e| invalid(format!("{ERR_PREFIX} serialization failed: {e}")))
}

fn emit(out: &mut dyn Write, object: Map<String, Value>) -> Result<CommandStatus, DawgError> {
    let text = serde_json::to_string(&Value::Object(object))
        .map_err(|e| invalid(format!("{ERR_PREFIX} serialization failed: {e}")))?;
    writeln!(out, "{text}")?;
    Ok(CommandStatus::Success)
}

fn invalid<T: Into<String>>(message: T) -> DawgError {
    DawgError::invalid_input(message.into())
}
