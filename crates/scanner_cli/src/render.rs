use std::path::Path;

use colored::Colorize;
use scanner_core::catalog::{GENRES, PROVIDERS};
use scanner_core::{
    new_title_row_view, title_row_view, MonetizationLabel, NewTitleRow, TitleNode, TitleRowView,
    UpstreamError,
};

const INDENT: &str = "     ";

pub fn banner() {
    println!("{}", "\n╔════════════════════════════════════════╗".bold().cyan());
    println!("{}", "║     JustWatch Scanner para Argentina   ║".bold().cyan());
    println!("{}", "╚════════════════════════════════════════╝\n".bold().cyan());
    println!(
        "{}\n",
        format!(
            "✓ {} plataformas y {} géneros disponibles",
            PROVIDERS.len(),
            GENRES.len()
        )
        .green()
    );
}

pub fn searching(what: &str) {
    println!("{}", format!("\n{what}...").dimmed());
}

pub fn nothing_found() {
    println!("{}", "\nNo se encontraron títulos con esos filtros.".yellow());
}

pub fn failure(err: &UpstreamError) {
    eprintln!("{} {}", "Error en la búsqueda:".red().bold(), err.user_message().red());
}

pub fn partial(err: &UpstreamError, kept: usize) {
    println!(
        "{}",
        format!(
            "\n⚠ Resultados parciales ({kept}): la búsqueda se interrumpió. {}",
            err.user_message()
        )
        .yellow()
    );
}

pub fn exported(path: &Path) {
    println!("{}", format!("\n✓ Exportado a {}", path.display()).green());
}

pub fn goodbye() {
    println!("{}", "\n¡Hasta luego! 👋\n".cyan());
}

pub fn new_titles(rows: &[NewTitleRow]) {
    heading(rows.len());
    for (index, row) in rows.iter().enumerate() {
        for line in entry_lines(&new_title_row_view(index + 1, row)) {
            println!("{line}");
        }
        println!();
    }
}

pub fn titles(nodes: &[TitleNode]) {
    heading(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        for line in entry_lines(&title_row_view(index + 1, node)) {
            println!("{line}");
        }
        println!();
    }
}

pub fn providers() {
    println!("{}", "\n═══ Plataformas disponibles en Argentina ═══\n".bold().green());
    for provider in PROVIDERS {
        println!("  {} {}", format!("{:<10}", provider.code).cyan(), provider.clear_name);
    }
    println!();
}

pub fn genres() {
    println!("{}", "\n═══ Géneros disponibles ═══\n".bold().green());
    for genre in GENRES {
        println!("  {} {}", format!("{:<10}", genre.code).cyan(), genre.translation);
    }
    println!();
}

fn heading(count: usize) {
    println!(
        "\n{}\n",
        format!("═══ Encontrados {count} títulos ═══").bold().green()
    );
}

fn entry_lines(view: &TitleRowView) -> Vec<String> {
    let icon = if view.is_movie { "🎬" } else { "📺" };
    let year = view
        .year
        .map(|year| year.to_string())
        .unwrap_or_else(|| "?".to_string());
    let mut first = format!(
        "{}. {icon} {} {}",
        format!("{:>3}", view.position).cyan(),
        view.title.bold().white(),
        format!("({year})").dimmed()
    );
    if let Some(score) = &view.imdb_score {
        first.push_str(&format!(" {}", format!("⭐ {score}").yellow()));
    }
    let mut lines = vec![first];

    if let (Some(platform), Some(label)) = (&view.platform, &view.monetization) {
        let mut line = format!("{INDENT}{} • {}", platform.magenta(), monetization(label));
        if let Some(quality) = &view.quality {
            line.push_str(&format!(" {}", format!("[{quality}]").dimmed()));
        }
        lines.push(line);
    }
    if let Some(added) = &view.added {
        lines.push(format!("{INDENT}{}", format!("Agregado: {added}").dimmed()));
    }
    if let Some(genres) = &view.genres {
        lines.push(format!("{INDENT}{} {genres}", "Géneros:".dimmed()));
    }
    if let Some(runtime) = &view.runtime {
        lines.push(format!("{INDENT}{} {runtime}", "Duración:".dimmed()));
    }
    lines.push(format!("{INDENT}{}", view.url.blue().underline()));
    lines
}

fn monetization(label: &MonetizationLabel) -> colored::ColoredString {
    let text = label.to_string();
    match label {
        MonetizationLabel::Streaming => text.green(),
        MonetizationLabel::Rent(_) => text.yellow(),
        MonetizationLabel::Buy(_) => text.red(),
        MonetizationLabel::Other(_) => text.blue(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scanner_core::MonetizationType;

    fn view() -> TitleRowView {
        TitleRowView {
            position: 7,
            is_movie: false,
            title: "Okupas".to_string(),
            year: Some(2000),
            imdb_score: Some("8.6".to_string()),
            platform: Some("Netflix".to_string()),
            monetization: Some(MonetizationLabel::Streaming),
            quality: Some("HD".to_string()),
            added: Some("2/3/2024".to_string()),
            genres: Some("Drama, Crimen".to_string()),
            runtime: None,
            url: "https://www.justwatch.com/ar/serie/okupas".to_string(),
        }
    }

    #[test]
    fn entry_lists_every_known_detail() {
        colored::control::set_override(false);
        let lines = entry_lines(&view());
        assert_eq!(
            lines,
            vec![
                "  7. 📺 Okupas (2000) ⭐ 8.6".to_string(),
                "     Netflix • Streaming [HD]".to_string(),
                "     Agregado: 2/3/2024".to_string(),
                "     Géneros: Drama, Crimen".to_string(),
                "     https://www.justwatch.com/ar/serie/okupas".to_string(),
            ]
        );
    }

    #[test]
    fn entry_without_offer_skips_platform_line() {
        colored::control::set_override(false);
        let bare = TitleRowView {
            platform: None,
            monetization: Some(MonetizationLabel::Other(MonetizationType::Free)),
            added: None,
            genres: None,
            imdb_score: None,
            year: None,
            ..view()
        };
        let lines = entry_lines(&bare);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "  7. 📺 Okupas (?)");
    }
}
