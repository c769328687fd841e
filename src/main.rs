use anyhow::{Context, Result};
use clap::Parser;
use grades_common::{
    assign_subject_colors, collect_subjects_with_code, default_checked_subjects, first_preference_trend, guard,
    normalize_subject_name, DashboardReport, Exam, FirstPreferenceTrend, Route, TabOptions, TabView,
};
use grades_dashboard::{cli, config, error, export, loader, logger};
use cli::{Cli, Commands, ExportFormat};
use config::Config;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    // 設定はセッションや既定値を使うコマンドでだけ読む
    match cli.command {
        Commands::Dashboard { input, tab, metric, exam, check, uncheck, output } => {
            let config = Config::load()?;
            require_session(&config)?;
            let exams = load(&input)?;
            let tab = match tab {
                Some(tab) => tab,
                None => config.default_tab()?,
            };

            let options = TabOptions {
                metric,
                selected_exam: exam,
                checked: None,
                check,
                uncheck,
            };
            let view = TabView::build(&exams, tab, &options);
            if view.is_empty() {
                tracing::warn!(tab = tab.label(), "タブに該当する模試がありません");
            }

            let json = serde_json::to_string_pretty(&view)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("書き込みに失敗: {}", path.display()))?;
                    println!("✔ {}タブを出力: {}", tab, path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Judgment { input, output } => {
            let config = Config::load()?;
            require_session(&config)?;
            let exams = load(&input)?;

            let Some(trend) = first_preference_trend(&exams) else {
                println!("第1志望の判定データがありません");
                return Ok(());
            };

            match output {
                Some(path) => {
                    let json = serde_json::to_string_pretty(&trend)?;
                    std::fs::write(&path, json)
                        .with_context(|| format!("書き込みに失敗: {}", path.display()))?;
                    println!("✔ 第1志望判定推移を出力: {}", path.display());
                }
                None => {
                    println!("第１志望：{}\n", trend.title);
                    for section in &trend.sections {
                        println!("[{}]", section.bucket.label());
                        let names: Vec<&str> = section.columns.iter().map(|c| c.short_name.as_str()).collect();
                        println!("  {:<6} {}", "", names.join("  "));
                        if section.shows_kyote() {
                            let row: Vec<&str> = section.columns.iter().map(|c| c.kyote_display()).collect();
                            println!("  {:<6} {}", "共テ", row.join("  "));
                        }
                        let row: Vec<&str> = section.columns.iter().map(|c| c.niji_display()).collect();
                        println!("  {:<6} {}", "2次", row.join("  "));
                    }
                }
            }
        }

        Commands::Subjects { input, tab } => {
            let exams = load(&input)?;
            let exams: Vec<Exam> = match tab {
                Some(tab) => tab.filter(&exams),
                None => exams,
            };

            let subjects = collect_subjects_with_code(&exams);
            let colors = assign_subject_colors(&subjects);
            let checked = default_checked_subjects(&subjects);

            println!("受験科目: {}件", subjects.len());
            for subject in &subjects {
                println!(
                    "  {} {:>6}  {}  {}",
                    if checked.contains(&subject.name) { "☑" } else { "☐" },
                    subject.code,
                    colors.get(&subject.name).copied().unwrap_or("-"),
                    subject.name,
                );
            }
        }

        Commands::Normalize { names } => {
            for name in &names {
                println!("{} → {}", name, normalize_subject_name(Some(name.as_str())));
            }
        }

        Commands::Export { input, output, title, metric, format, font } => {
            let config = Config::load()?;
            require_session(&config)?;
            println!("📄 grades - エクスポート\n");

            let exams = load(&input)?;
            let title = title.unwrap_or_else(|| config.export_title.clone());
            let options = TabOptions { metric, ..Default::default() };
            let report = DashboardReport::build(&exams, &title, &options);
            println!("✔ {}タブ分の成績を集計", report.tabs.len());

            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            let today = chrono::Local::now().date_naive();
            let font = font.or_else(|| config.pdf_font.clone());

            match format {
                ExportFormat::Excel => {
                    let excel_path = export::output_path(&output_dir, &title, today, "xlsx");
                    write_excel(&report, &excel_path)?;
                }
                ExportFormat::Pdf => {
                    let pdf_path = export::output_path(&output_dir, export::PDF_TITLE, today, "pdf");
                    write_pdf(report.first_preference.as_ref(), &pdf_path, font.as_deref())?;
                }
                ExportFormat::Both => {
                    let (pdf_path, excel_path) = export::output_paths_for_both(&output_dir, &title, today);
                    write_pdf(report.first_preference.as_ref(), &pdf_path, font.as_deref())?;
                    write_excel(&report, &excel_path)?;
                }
            }

            println!("\n✅ エクスポート完了");
        }

        Commands::Config { set_token, clear_token, login_id, admin, default_tab, pdf_font, show } => {
            let mut config = Config::load()?;
            let mut changed = false;

            if let Some(token) = set_token {
                config.access_token = Some(token);
                changed = true;
            }
            if clear_token {
                config.access_token = None;
                changed = true;
            }
            if let Some(id) = login_id {
                config.login_id = Some(id);
                changed = true;
            }
            if let Some(admin) = admin {
                config.is_admin = admin;
                changed = true;
            }
            if let Some(tab) = default_tab {
                config.default_tab = tab.to_string();
                changed = true;
            }
            if let Some(path) = pdf_font {
                config.pdf_font = Some(path);
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  トークン: {}", if config.access_token().is_some() { "設定済み" } else { "未設定" });
                println!("  ログインID: {}", config.login_id.as_deref().unwrap_or("-"));
                println!("  管理者: {}", if config.is_admin { "はい" } else { "いいえ" });
                println!("  既定タブ: {}", config.default_tab);
                println!("  出力タイトル: {}", config.export_title);
                println!(
                    "  PDFフォント: {}",
                    config.pdf_font.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "-".into())
                );
            }
        }
    }

    Ok(())
}

fn write_excel(report: &DashboardReport, path: &Path) -> error::Result<()> {
    println!("- Excelを生成中...");
    export::excel::generate_excel(report, path)?;
    println!("✔ Excel出力: {}", path.display());
    Ok(())
}

fn write_pdf(trend: Option<&FirstPreferenceTrend>, path: &Path, font: Option<&Path>) -> error::Result<()> {
    let Some(trend) = trend else {
        println!("- 第1志望の判定データがないためPDFは出力しません");
        return Ok(());
    };
    println!("- PDFを生成中...");
    export::pdf::generate_pdf(trend, path, font)?;
    println!("✔ PDF出力: {}", path.display());
    Ok(())
}

/// 生徒詳細画面と同じガードを通す
fn require_session(config: &Config) -> error::Result<()> {
    let session = guard(Route::StudentDetail, &config.session_context())?;
    tracing::debug!(admin = session.is_admin(), "セッション確認済み");
    Ok(())
}

fn load(input: &Path) -> error::Result<Vec<Exam>> {
    let exams = loader::load_exams(input)?;
    loader::require_exams(exams, input)
}
