//! skm outdated - Compare installed skills with the registry

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, finish};
use crate::error::Result;
use crate::ops::{CheckOutdated, OutdatedReport, ProgressReporter};

#[derive(Args, Debug)]
pub struct OutdatedArgs {
    /// Include skills that are current
    #[arg(long, short)]
    pub all: bool,
}

pub fn run(ctx: &AppContext, args: &OutdatedArgs) -> Result<()> {
    let progress = ctx.progress();
    progress.start("Checking for updates...");
    let outcome = CheckOutdated::new(&ctx.store, &*ctx.registry).execute();
    progress.stop("Checked for updates");

    let report = finish(ctx.output_format, outcome)?;
    if !ctx.is_json() {
        emit_human(render(&report, args.all));
    }
    Ok(())
}

fn render(report: &OutdatedReport, all: bool) -> HumanLayout {
    let mut layout = HumanLayout::new();
    if report.total_installed == 0 {
        layout.push_line("No skills installed.");
        return layout;
    }

    if report.outdated_count == 0 {
        layout.push_line(format!(
            "{} All {} installed skill(s) are up to date.",
            "✓".green(),
            report.total_installed
        ));
    } else {
        layout.title(&format!(
            "{} of {} skill(s) have updates",
            report.outdated_count, report.total_installed
        ));
    }

    for skill in report.skills.iter().filter(|skill| all || skill.has_update) {
        let line = if skill.has_update {
            format!(
                "{} {} -> {}",
                skill.name.bold(),
                skill.installed_version.yellow(),
                skill.latest_version.green()
            )
        } else {
            format!(
                "{} {} ({})",
                skill.name,
                skill.installed_version,
                skill.latest_version.dimmed()
            )
        };
        layout.bullet(&line);
    }
    if report.outdated_count > 0 {
        layout.blank();
        layout.push_line("Reinstall a skill to update it: skm uninstall <name> && skm install <name>");
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::OutdatedSkill;

    fn report() -> OutdatedReport {
        OutdatedReport {
            skills: vec![
                OutdatedSkill {
                    name: "old".to_string(),
                    installed_version: "1.0.0".to_string(),
                    latest_version: "1.1.0".to_string(),
                    has_update: true,
                },
                OutdatedSkill {
                    name: "fresh".to_string(),
                    installed_version: "2.0.0".to_string(),
                    latest_version: "2.0.0".to_string(),
                    has_update: false,
                },
            ],
            total_installed: 2,
            outdated_count: 1,
        }
    }

    #[test]
    fn shows_only_outdated_by_default() {
        colored::control::set_override(false);
        console::set_colors_enabled(false);
        let text = render(&report(), false).build();
        assert!(text.contains("1 of 2 skill(s) have updates"));
        assert!(text.contains("- old 1.0.0 -> 1.1.0"));
        assert!(!text.contains("fresh"));
    }

    #[test]
    fn all_flag_includes_current_skills() {
        colored::control::set_override(false);
        console::set_colors_enabled(false);
        let text = render(&report(), true).build();
        assert!(text.contains("- fresh 2.0.0 (2.0.0)"));
    }
}
