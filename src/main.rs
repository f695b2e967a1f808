use autopatch::model::{UnitGraph, UnitGraphArenas};
use autopatch::patch::{
    Classifier, ConflictPolicy, Error, InsertionLedger, NameRegistry, NamingScheme, PatchPlan,
    Settings,
};
use autopatch::snapshot::Snapshot;

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::json;
use std::fs;
use std::io;

fn main() -> Result<(), Error> {
    env_logger::init();

    let matches = Command::new("Hot-patch classifier")
        .version(clap::crate_version!())
        .about("Classify annotated classes and methods, and name the patch classes they need")
        .arg(
            Arg::new("ledger")
                .long("ledger")
                .value_name("FILE")
                .required(true)
                .help("Code-insertion ledger: JSON object from method long name to method number"),
        )
        .arg(
            Arg::new("patch-package")
                .long("patch-package")
                .value_name("PACKAGE")
                .help("Package for generated patch classes (eg. `com.hotfix.patch`)"),
        )
        .arg(
            Arg::new("patch-suffix")
                .long("patch-suffix")
                .value_name("SUFFIX")
                .help("Suffix appended to patch class names"),
        )
        .arg(
            Arg::new("assist-suffix")
                .long("assist-suffix")
                .value_name("SUFFIX")
                .help("Suffix appended to assist class names"),
        )
        .arg(
            Arg::new("added-annotation")
                .long("added-annotation")
                .value_name("CLASS_NAME")
                .help("Annotation marking added classes and methods"),
        )
        .arg(
            Arg::new("modified-annotation")
                .long("modified-annotation")
                .value_name("CLASS_NAME")
                .help("Annotation marking modified methods"),
        )
        .arg(
            Arg::new("qualify-patch-names")
                .long("qualify-patch-names")
                .action(ArgAction::SetTrue)
                .help("Include a hash of the source package in patch class names"),
        )
        .arg(
            Arg::new("reject-conflicting-markers")
                .long("reject-conflicting-markers")
                .action(ArgAction::SetTrue)
                .help("Fail on methods marked both added and modified"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("FILE")
                .help("Write the result here instead of to standard output"),
        )
        .arg(
            Arg::new("INPUT")
                .help("Sets the input class snapshot (JSON) to use")
                .required(true)
                .index(1),
        )
        .get_matches();

    let settings = settings_from(&matches)?;

    let snapshot_file = matches
        .get_one::<String>("INPUT")
        .expect("INPUT is a required argument");
    log::info!("Reading classes from '{}'", snapshot_file);
    let snapshot = Snapshot::from_json(io::BufReader::new(fs::File::open(snapshot_file)?))?;

    let ledger_file = matches
        .get_one::<String>("ledger")
        .expect("ledger is a required argument");
    log::info!("Reading code-insertion ledger from '{}'", ledger_file);
    let ledger = InsertionLedger::from_json(io::BufReader::new(fs::File::open(ledger_file)?))?;

    let arenas = UnitGraphArenas::new();
    let graph = UnitGraph::new(&arenas);
    let classes = snapshot.load_into(&graph)?;

    let manifest = Classifier::new(&settings).classify(&graph, &classes, &ledger)?;
    let registry = NameRegistry::new(&settings);
    let plan = PatchPlan::build(&manifest, &registry)?;

    let names: Vec<_> = registry
        .entries()
        .map(|(patch_class, source_class)| {
            json!({ "patch_class": patch_class, "source_class": source_class })
        })
        .collect();
    let result = json!({ "manifest": manifest, "plan": plan, "names": names });

    match matches.get_one::<String>("output") {
        Some(output_file) => {
            log::info!("Writing '{}'", output_file);
            let writer = io::BufWriter::new(fs::File::create(output_file)?);
            serde_json::to_writer_pretty(writer, &result)?;
        }
        None => {
            serde_json::to_writer_pretty(io::stdout().lock(), &result)?;
            println!();
        }
    }

    Ok(())
}

fn settings_from(matches: &ArgMatches) -> Result<Settings, Error> {
    let mut settings = Settings::new()?;
    if let Some(package) = matches.get_one::<String>("patch-package") {
        settings = settings.with_patch_package(package.as_str())?;
    }
    if let Some(suffix) = matches.get_one::<String>("patch-suffix") {
        settings = settings.with_patch_class_suffix(suffix.as_str())?;
    }
    if let Some(suffix) = matches.get_one::<String>("assist-suffix") {
        settings = settings.with_assist_class_suffix(suffix.as_str())?;
    }
    if let Some(name) = matches.get_one::<String>("added-annotation") {
        settings = settings.with_added_annotation(name.as_str())?;
    }
    if let Some(name) = matches.get_one::<String>("modified-annotation") {
        settings = settings.with_modified_annotation(name.as_str())?;
    }
    if matches.get_flag("qualify-patch-names") {
        settings = settings.with_naming_scheme(NamingScheme::PackageQualified);
    }
    if matches.get_flag("reject-conflicting-markers") {
        settings = settings.with_conflicting_markers(ConflictPolicy::Reject);
    }
    Ok(settings)
}
