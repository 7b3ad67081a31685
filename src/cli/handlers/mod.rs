use std::path::Path;

use tracing::{debug, warn};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::events::replay;
use crate::io::{config_io, page_io};
use crate::model::dom::NodeId;
use crate::model::page::Page;
use crate::ops::init::{InitReport, initialize};
use crate::ops::{check, submit};
use crate::parse::script_parser::{Step, parse_step};
use crate::parse::serialize_outline;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Render(args) => cmd_render(args, json),
        Commands::Check(args) => cmd_check(args, config, json),
        Commands::Run(args) => cmd_run(args, config, json),
        Commands::Submit(args) => cmd_submit(args, config, json),
        Commands::Config => cmd_config(),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the page and its config, then wire every widget.
fn load_wired_page(
    page_path: &Path,
    config: Option<&Path>,
) -> Result<(Page, InitReport), Box<dyn std::error::Error>> {
    let dom = page_io::load_page(page_path)?;
    let config = config_io::read_config(config, page_path)?;
    let mut page = Page::new(dom, config);
    let report = initialize(&mut page);
    Ok((page, report))
}

fn resolve_form(page: &Page, form: Option<&str>) -> Result<Option<NodeId>, String> {
    match form {
        None => Ok(None),
        Some(id) => page
            .dom
            .get_element_by_id(id)
            .map(Some)
            .ok_or_else(|| format!("no element with id '{}' on the page", id)),
    }
}

fn print_skipped(report: &InitReport) {
    for (widget, err) in &report.skipped {
        eprintln!("note: {} not attached: {}", widget, err);
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_render(args: PageArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dom = page_io::load_page(&args.page)?;
    if json {
        let tree: Vec<NodeJson> = dom
            .children(dom.root())
            .iter()
            .map(|&child| node_json(&dom, child))
            .collect();
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", serialize_outline(&dom));
    }
    Ok(())
}

fn cmd_check(
    args: PageArgs,
    config: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let dom = page_io::load_page(&args.page)?;
    let config = config_io::read_config(config, &args.page)?;
    let result = check::check_page(&dom, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if !result.errors.is_empty() {
        println!("Errors:");
        for err in &result.errors {
            match err {
                check::CheckError::TemplateWithoutRemoveControl { list, template } => {
                    println!("  [{}] template #{} has no remove control", list, template);
                }
                check::CheckError::TemplateWithExtraRemoveControls {
                    list,
                    template,
                    count,
                } => {
                    println!(
                        "  [{}] template #{} has {} remove controls; only the first is wired",
                        list, template, count
                    );
                }
                check::CheckError::AnchorOutsideContainer { list, anchor } => {
                    println!("  [{}] anchor #{} is outside the container", list, anchor);
                }
                check::CheckError::AnchorNotLast { list, anchor } => {
                    println!("  [{}] anchor #{} is not the container's last child", list, anchor);
                }
                check::CheckError::MissingTombstoneTemplate { list, template } => {
                    println!(
                        "  [{}] rows can be deleted but tombstone template #{} is missing",
                        list, template
                    );
                }
                check::CheckError::RemoveControlWithoutIdentity { list } => {
                    println!("  [{}] a remove control carries no entity id", list);
                }
                check::CheckError::MissingTrackedField { form, field } => {
                    println!("  form #{} is missing tracked field {}", form, field);
                }
                check::CheckError::MissingDropdownPanel { trigger, panel } => {
                    println!("  dropdown #{} has no panel #{}", trigger, panel);
                }
            }
        }
    }
    if !result.warnings.is_empty() {
        if !result.errors.is_empty() {
            println!();
        }
        println!("Warnings:");
        for warning in &result.warnings {
            match warning {
                check::CheckWarning::ListAbsent { list } => {
                    println!("  [{}] list not on this page", list);
                }
                check::CheckWarning::ListIncomplete { list, missing } => {
                    println!("  [{}] missing #{}", list, missing.join(", #"));
                }
                check::CheckWarning::TemplateVisible { template } => {
                    println!("  template #{} is not hidden", template);
                }
                check::CheckWarning::TombstoneTemplateEnabled { template } => {
                    println!("  tombstone template #{} is enabled and will submit", template);
                }
                check::CheckWarning::DirtyFormAbsent { form } => {
                    println!("  form #{} not on this page", form);
                }
                check::CheckWarning::DropdownAbsent { trigger } => {
                    println!("  dropdown #{} not on this page", trigger);
                }
            }
        }
    }
    if result.valid {
        println!("✓ page is valid");
    } else {
        println!("✗ page has errors");
    }
    Ok(())
}

fn cmd_run(
    args: RunArgs,
    config: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut page, report) = load_wired_page(&args.page, config)?;

    let mut steps: Vec<Step> = match &args.script {
        Some(path) => page_io::load_script(path)?,
        None => Vec::new(),
    };
    for (i, text) in args.steps.iter().enumerate() {
        steps.push(parse_step(text.trim(), i + 1).map_err(|e| format!("--step: {}", e))?);
    }
    debug!(steps = steps.len(), "replaying");

    let reports = replay::replay(&mut page, &steps)?;
    let handler_errors: Vec<String> = reports
        .iter()
        .flat_map(|r| r.errors.iter().map(|e| e.to_string()))
        .collect();
    for err in &handler_errors {
        warn!(error = %err, "handler failed");
    }

    let scope = resolve_form(&page, args.form.as_deref())?;
    let submission = submit::snapshot(&page, scope);
    let lists = lists_json(&page);

    if json {
        let out = RunJson {
            page: serialize_outline(&page.dom),
            attached: report.attached.clone(),
            skipped: skipped_json(&report),
            lists,
            submission,
            handler_errors,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_skipped(&report);
        print!("{}", serialize_outline(&page.dom));
        println!();
        print!("{}", format_lists(&lists));
        println!();
        print!("{}", format_submission(&submission));
    }
    Ok(())
}

fn cmd_submit(
    args: SubmitArgs,
    config: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (page, report) = load_wired_page(&args.page, config)?;
    let scope = resolve_form(&page, args.form.as_deref())?;
    let submission = submit::snapshot(&page, scope);

    if json {
        println!("{}", serde_json::to_string_pretty(&submission)?);
    } else {
        print_skipped(&report);
        print!("{}", format_submission(&submission));
    }
    Ok(())
}

fn cmd_config() -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", config_io::default_config_toml()?);
    Ok(())
}
