use crate::application::{App, AppMode, Stage, ViewState};
use crate::domain::{
    Bouquet, FlowerCatalog, FlowerSize, GREENERY_VARIANTS, LetterField, MAX_FLOWERS,
    MAX_MESSAGE_CHARS, StoredBouquet, WRAPPERS, arrange, wrapper,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match underlying_mode(app) {
        AppMode::Composing | AppMode::Help => render_stage(f, app, chunks[1]),
        AppMode::Viewing => render_view(f, app, chunks[1]),
        AppMode::Garden => render_garden(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

/// Screen drawn underneath the help popup.
fn underlying_mode(app: &App) -> AppMode {
    if app.mode == AppMode::Help {
        app.help_return
    } else {
        app.mode
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let location = match underlying_mode(app) {
        AppMode::Composing | AppMode::Help => format!(
            "Step {}/{}: {} | {} / {} blooms",
            app.stage.index() + 1,
            Stage::ALL.len(),
            app.stage.title(),
            app.store.total_flowers(),
            MAX_FLOWERS
        ),
        AppMode::Viewing => "Viewing bouquet".to_string(),
        AppMode::Garden => format!("Garden | {} bouquets", app.garden.len()),
    };
    let header = Paragraph::new(format!("Bloomy ({}) | {}", app.display_mode, location))
        .style(Style::default().fg(Color::Magenta));
    f.render_widget(header, area);
}

fn render_stage(f: &mut Frame, app: &App, area: Rect) {
    match app.stage {
        Stage::Flowers => render_flower_picker(f, app, area),
        Stage::Bundling => render_customizer(f, app, area),
        Stage::Message => render_card_writer(f, app, area),
        Stage::Send => render_share(f, app, area),
    }
}

fn render_flower_picker(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let header = Row::new(["", "Flower", "Meaning", "Birth month", "Size", "Picked"])
        .style(Style::default().fg(Color::Yellow))
        .height(1);

    let rows = app.catalog.flowers().iter().enumerate().map(|(index, flower)| {
        let count = app.store.bouquet().count_of(flower.id);
        let style = if index == app.selected_flower {
            Style::default().bg(Color::LightMagenta).fg(Color::Black)
        } else if count > 0 {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default()
        };
        Row::new([
            Cell::from(size_glyph(flower.size)),
            Cell::from(flower.name.to_uppercase()),
            Cell::from(flower.meaning.clone()),
            Cell::from(flower.birth_month.clone()),
            Cell::from(flower.size.label()),
            Cell::from(if count > 0 { format!("x{}", count) } else { String::new() }),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(2),
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Pick 6 to 10 blooms"))
        .column_spacing(1);
    f.render_widget(table, chunks[0]);

    let summary = app
        .store
        .bouquet()
        .flowers
        .iter()
        .filter_map(|entry| {
            app.catalog
                .get(entry.id)
                .map(|flower| format!("{} x{}", flower.name.to_uppercase(), entry.count))
        })
        .collect::<Vec<_>>()
        .join("  ");
    let summary = Paragraph::new(summary)
        .block(Block::default().borders(Borders::ALL).title("Your bouquet"));
    f.render_widget(summary, chunks[1]);
}

fn render_customizer(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(0)])
        .split(area);

    let bouquet = app.store.bouquet();
    let mut lines = vec![
        Line::from(format!(
            "Greenery: {}/{}",
            bouquet.greenery.index() + 1,
            GREENERY_VARIANTS
        )),
        Line::from(""),
        Line::from("Wrapper:"),
    ];
    for (index, wrap) in WRAPPERS.iter().enumerate() {
        let selected = bouquet.wrapper.as_deref() == Some(wrap.id);
        let marker = if selected { "(*)" } else { "( )" };
        let style = if selected {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::styled(format!("  {} {} {}", index + 1, marker, wrap.name), style));
    }
    let controls = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Customize"));
    f.render_widget(controls, chunks[0]);

    render_bouquet(f, bouquet, &app.catalog, chunks[1], "Arrangement");
}

fn render_card_writer(f: &mut Frame, app: &App, area: Rect) {
    let letter = &app.store.bouquet().letter;
    let field_style = |field: LetterField| {
        if app.letter_field == field {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default()
        }
    };

    let mut lines = vec![Line::from(vec![
        Span::raw("Dear "),
        Span::styled(placeholder(&letter.recipient, "Beloved,"), field_style(LetterField::Recipient)),
    ])];
    lines.push(Line::from(""));
    let message = placeholder(
        &letter.message,
        "I have so much to tell you, but only this much space on this card!",
    );
    for text in message.split('\n') {
        lines.push(Line::styled(text.to_string(), field_style(LetterField::Message)));
    }
    lines.push(Line::styled(
        format!("{}/{}", letter.message.chars().count(), MAX_MESSAGE_CHARS),
        Style::default().fg(Color::DarkGray),
    ));
    lines.push(Line::from(""));
    lines.push(Line::from("Sincerely,"));
    lines.push(Line::styled(
        placeholder(&letter.sender, "Secret Admirer"),
        field_style(LetterField::Sender),
    ));

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Write the card"));
    f.render_widget(card, area);
}

fn render_share(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(area);

    render_bouquet(f, app.store.bouquet(), &app.catalog, chunks[0], "Send the bouquet");

    let text = match &app.share_link {
        Some(link) => vec![
            Line::from(format!("View: {}", link.view_url)),
            Line::from(format!("WhatsApp: {}", link.whatsapp_url)),
            Line::from("h: make one for someone else"),
        ],
        None => vec![Line::from("Enter: create shareable link")],
    };
    let share = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Share"));
    f.render_widget(share, chunks[1]);
}

fn render_view(f: &mut Frame, app: &App, area: Rect) {
    match &app.view {
        Some(ViewState::Loaded(stored)) => render_stored(f, stored, &app.catalog, area),
        Some(ViewState::NotFound(id)) => {
            let text = vec![
                Line::from(format!("Bouquet {} could not be found.", id)),
                Line::from(""),
                Line::from("Press h to go home and make your own."),
            ];
            let missing = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title("Not found"));
            f.render_widget(missing, area);
        }
        None => {}
    }
}

fn render_stored(f: &mut Frame, stored: &StoredBouquet, catalog: &FlowerCatalog, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_bouquet(f, &stored.bouquet, catalog, chunks[0], "A bouquet for you");

    let letter = &stored.bouquet.letter;
    let mut lines = vec![Line::from(format!("Dear {}", letter.recipient)), Line::from("")];
    lines.extend(letter.message.split('\n').map(|text| Line::from(text.to_string())));
    lines.push(Line::from(""));
    lines.push(Line::from("Sincerely,"));
    lines.push(Line::from(letter.sender.clone()));
    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Card"));
    f.render_widget(card, chunks[1]);
}

/// Draws the flowers in arrangement order, with greenery and wrapper noted.
fn render_bouquet(f: &mut Frame, bouquet: &Bouquet, catalog: &FlowerCatalog, area: Rect, title: &str) {
    let placements = arrange(bouquet, catalog);
    let flowers: Vec<Span> = placements
        .iter()
        .flat_map(|placement| {
            [
                Span::styled(
                    flower_cell(placement.flower.size, &placement.flower.name),
                    Style::default().fg(flower_color(placement.flower.color.as_deref(), &bouquet.mode)),
                ),
                Span::raw(" "),
            ]
        })
        .collect();

    let wrap_name = bouquet
        .wrapper
        .as_deref()
        .map(|id| wrapper(id).map(|w| w.name).unwrap_or(id))
        .unwrap_or("none");
    let lines = vec![
        Line::from(flowers),
        Line::from(""),
        Line::styled(
            format!(
                "greenery {} | wrapper {}",
                bouquet.greenery.index() + 1,
                wrap_name
            ),
            Style::default().fg(Color::Green),
        ),
    ];
    let preview = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(preview, area);
}

fn render_garden(f: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["#", "For", "From", "Blooms", "Planted on"])
        .style(Style::default().fg(Color::Yellow))
        .height(1);
    let rows = app.garden.iter().enumerate().map(|(index, stored)| {
        let style = if index == app.garden_selected {
            Style::default().bg(Color::LightMagenta).fg(Color::Black)
        } else {
            Style::default()
        };
        Row::new([
            Cell::from(stored.id.to_string()),
            Cell::from(stored.bouquet.letter.recipient.clone()),
            Cell::from(stored.bouquet.letter.sender.clone()),
            Cell::from(stored.bouquet.total_flowers().to_string()),
            Cell::from(
                stored
                    .planted_on()
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ),
        ])
        .style(style)
    });
    let widths = [
        Constraint::Length(6),
        Constraint::Min(12),
        Constraint::Min(12),
        Constraint::Length(7),
        Constraint::Length(11),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Garden"))
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match &app.status_message {
        Some(status) if app.mode != AppMode::Help => status.clone(),
        _ => key_hints(app).to_string(),
    };

    let style = match app.mode {
        AppMode::Composing if app.stage == Stage::Message => Style::default().fg(Color::Green),
        AppMode::Help => Style::default().fg(Color::Cyan),
        _ => Style::default(),
    };
    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(input, area);
}

fn key_hints(app: &App) -> &'static str {
    match app.mode {
        AppMode::Composing => match app.stage {
            Stage::Flowers => "↑↓: browse | Enter/a: add | Backspace/x: remove | →: next | G: garden | ?: help | q: quit",
            Stage::Bundling => "s: new arrangement | c: change greenery | 1-3: wrapper | ←→: back/next | ?: help",
            Stage::Message => "Type to write | Tab: next field | Ctrl+N/Ctrl+P: next/back | Esc: back",
            Stage::Send => "Enter: create shareable link | ←: back | h: start over | q: quit",
        },
        AppMode::Viewing => "h/Esc: home | G: garden | q: quit",
        AppMode::Garden => "↑↓: browse | Enter: view | Ctrl+E: export CSV | h/Esc: home | q: quit",
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help",
    }
}

fn placeholder(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Preview cell for one flower, wider for larger blooms.
fn flower_cell(size: FlowerSize, name: &str) -> String {
    let width = usize::from(size.dimension() / 8);
    format!("{:<width$}", format!("{} {}", size_glyph(size), name))
}

fn size_glyph(size: FlowerSize) -> &'static str {
    match size {
        FlowerSize::Small => "✿",
        FlowerSize::Medium => "❀",
        FlowerSize::Large => "❁",
    }
}

/// Terminal color for a flower; mono bouquets are drawn without color.
fn flower_color(color: Option<&str>, mode: &str) -> Color {
    if mode == "mono" {
        return Color::White;
    }
    match color {
        Some("red") => Color::Red,
        Some("pink") | Some("blush") | Some("peach") => Color::LightRed,
        Some("yellow") | Some("orange") => Color::Yellow,
        Some("violet") | Some("purple") => Color::Magenta,
        Some("white") => Color::White,
        _ => Color::LightMagenta,
    }
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("Bloomy Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"BLOOMY: A BOUQUET FOR SOMEONE

=== THE FOUR STEPS ===
1. Flowers      Pick 6 to 10 blooms. You can't move on until you have.
2. Bundling     Try new arrangements, change the greenery, pick a wrapper.
3. Message      Write a card: Dear ..., your message, Sincerely ...
4. Send         Plant the bouquet and get a link to share.

=== FLOWERS ===
↑↓ or j/k       Browse the catalog
Enter, a, +     Add one of the highlighted flower
Backspace, x, - Remove one of the highlighted flower
→ or n          Next step (needs 6 to 10 blooms)

=== BUNDLING ===
s               Shuffle into a new arrangement
c               Change greenery (cycles through 3)
1 / 2 / 3       Toggle the Classic / Elegant / Natural wrapper
← →             Previous / next step

=== MESSAGE ===
Typing          Writes into the highlighted field
Tab             Next field (recipient, message, sender)
Enter           New line in the message, next field elsewhere
Backspace       Delete the last character
Ctrl+N/Ctrl+P   Next / previous step
Esc             Previous step
                Messages stop at 500 characters

=== SEND ===
Enter           Create the shareable link. The link is copied to
                your clipboard when one is available.
h               Start a new bouquet

=== GARDEN ===
G               Open the garden of every planted bouquet
↑↓              Browse
Enter           View the highlighted bouquet
Ctrl+E          Export the garden to garden.csv
h / Esc         Go home

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#
}
