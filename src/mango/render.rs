//! Mango Clicker rendering: counter header, tabs, the mango, the shop and
//! modal overlays. Every tappable element registers its hit region here.

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::i18n::{fill, t, Text};
use crate::input::{is_narrow, ClickMap};
use crate::update::{UpdateInfo, VersionInfo};
use crate::widgets::{bar, ActionLines, TabBar};

use super::actions;
use super::format::{format_megabytes, format_number, format_seconds};
use super::formulas;
use super::logic::{self, Offer};
use super::state::{CloudStatus, Overlay, Tab};
use super::MangoGame;

const MANGO_ART: &[&str] = &[
    "     _/)    ",
    "  .-'  `-.  ",
    " /        \\ ",
    "|          |",
    " \\        / ",
    "  `-.__.-'  ",
];

const MANGO_PRESSED_ART: &[&str] = &[
    "            ",
    "    _/)     ",
    "  .-'`-.    ",
    " (      )   ",
    "  `-..-'    ",
    "            ",
];

const SPARKLE: &[&str] = &["·", "✦", "✧", "✦"];

pub fn render(game: &MangoGame, now_ms: u64, f: &mut Frame, area: Rect, map: &mut ClickMap) {
    let narrow = is_narrow(area.width);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(if narrow { 0 } else { 1 }),
        ])
        .split(area);

    render_header(game, f, chunks[0]);

    TabBar::new()
        .tab(t(game.lang, Text::ClickerTab), game.state.tab == Tab::Clicker, actions::TAB_CLICKER)
        .tab(t(game.lang, Text::ShopTab), game.state.tab == Tab::Shop, actions::TAB_SHOP)
        .render(f, chunks[1], map);

    match game.state.tab {
        Tab::Clicker => render_clicker(game, now_ms, f, chunks[2], map),
        Tab::Shop => render_shop(game, f, chunks[2], map),
    }

    render_notice(game, f, chunks[3]);

    if !narrow {
        let hint = Paragraph::new(Line::from(Span::styled(
            t(game.lang, Text::Controls),
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center);
        f.render_widget(hint, chunks[4]);
    }

    if let Some(overlay) = &game.state.overlay {
        render_overlay(game, overlay, f, area, map);
    }
}

fn render_header(game: &MangoGame, f: &mut Frame, area: Rect) {
    let lang = game.lang;
    let (cloud_text, cloud_color) = match game.state.cloud {
        CloudStatus::Offline => (t(lang, Text::CloudOffline), Color::DarkGray),
        CloudStatus::Syncing => (t(lang, Text::CloudSyncing), Color::Cyan),
        CloudStatus::Synced => (t(lang, Text::CloudSynced), Color::Green),
        CloudStatus::Failed => (t(lang, Text::CloudFailed), Color::Red),
    };

    let counter = Line::from(vec![
        Span::styled(
            format!("{}: ", t(lang, Text::Mangoes)),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format_number(game.state.data.clicks),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let border = if game.state.purchase_flash > 0 {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {} ", t(lang, Text::Title)),
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(format!(" {cloud_text} "), Style::default().fg(cloud_color))).right_aligned());

    f.render_widget(
        Paragraph::new(counter).alignment(Alignment::Center).block(block),
        area,
    );
}

fn render_clicker(game: &MangoGame, now_ms: u64, f: &mut Frame, area: Rect, map: &mut ClickMap) {
    let state = &game.state;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let art = if state.tap_flash > 0 {
        MANGO_PRESSED_ART
    } else {
        MANGO_ART
    };
    let art_height = art.len() as u16;
    let art_width = art[0].chars().count() as u16;

    // Art, a blank row, the cooldown bar and the hint, centred vertically.
    let block_height = art_height + 3;
    let top = inner.y + inner.height.saturating_sub(block_height) / 2;
    let art_area = Rect::new(
        inner.x + inner.width.saturating_sub(art_width) / 2,
        top,
        art_width.min(inner.width),
        art_height.min(inner.height),
    );

    let sparkle = SPARKLE[(state.anim_frame / 3) as usize % SPARKLE.len()];
    let lines: Vec<Line> = art
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let color = if i == 0 { Color::Green } else { Color::LightYellow };
            Line::from(Span::styled(*row, Style::default().fg(color)))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), art_area);
    if art_area.right() < inner.right() {
        f.render_widget(
            Paragraph::new(Span::styled(sparkle, Style::default().fg(Color::Yellow))),
            Rect::new(art_area.right(), art_area.y + 1, 1, 1),
        );
    }

    // The whole panel is the mango.
    map.add(inner, actions::TAP_MANGO);

    let remaining = state.data.cooldown_remaining_ms(now_ms);
    let status_y = art_area.bottom() + 1;
    if status_y < inner.bottom() {
        let cooldown_ms = state.data.cooldown_ms().max(1);
        let ready = 1.0 - remaining as f64 / cooldown_ms as f64;
        let bar_width = (inner.width.saturating_sub(4) as usize).min(20);
        let label = if remaining == 0 {
            Span::styled(t(game.lang, Text::Ready), Style::default().fg(Color::Green))
        } else {
            Span::styled(
                format!("{}{}", format_seconds(remaining as f64 / 1000.0), t(game.lang, Text::Seconds)),
                Style::default().fg(Color::DarkGray),
            )
        };
        let line = Line::from(vec![
            Span::styled(bar(ready, bar_width), Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            label,
        ]);
        f.render_widget(
            Paragraph::new(line).alignment(Alignment::Center),
            Rect::new(inner.x, status_y, inner.width, 1),
        );
    }
    if status_y + 1 < inner.bottom() {
        f.render_widget(
            Paragraph::new(Span::styled(
                t(game.lang, Text::TapHint),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center),
            Rect::new(inner.x, status_y + 1, inner.width, 1),
        );
    }

    render_particles(game, f, inner, art_area);
}

/// Floating `+N` labels drifting up from the top of the mango.
fn render_particles(game: &MangoGame, f: &mut Frame, inner: Rect, art_area: Rect) {
    let centre = (art_area.x + art_area.width / 2) as i32;
    for p in &game.state.particles {
        let age = p.max_life.saturating_sub(p.life) as u16;
        let Some(y) = art_area.y.checked_sub(age / 2 + 1).filter(|y| *y >= inner.y) else {
            continue;
        };
        let width = p.text.chars().count() as u16;
        let x = (centre + p.col_offset as i32 - width as i32 / 2).max(inner.x as i32) as u16;
        if x + width > inner.right() {
            continue;
        }
        let color = if p.life * 2 > p.max_life {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        f.render_widget(
            Paragraph::new(Span::styled(
                p.text.as_str(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Rect::new(x, y, width, 1),
        );
    }
}

fn offer_line<'a>(label: String, offer: Offer) -> Line<'a> {
    let style = match offer {
        Offer::Affordable(_) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        Offer::TooExpensive(_) => Style::default().fg(Color::Gray),
        Offer::Maxed => Style::default().fg(Color::DarkGray),
    };
    Line::from(Span::styled(label, style))
}

fn render_shop(game: &MangoGame, f: &mut Frame, area: Rect, map: &mut ClickMap) {
    let lang = game.lang;
    let data = &game.state.data;
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let mut lines = ActionLines::new();
    lines.push(Line::from(vec![
        Span::styled(format!(" {}: ", t(lang, Text::ClickDelay)), label),
        Span::styled(
            format!("{}{}", format_seconds(data.click_cooldown), t(lang, Text::Seconds)),
            value,
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!(" {}: ", t(lang, Text::DamagePerTap)), label),
        Span::styled(format_number(data.tap_damage()), value),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!(" {}: ", t(lang, Text::RebirthBonus)), label),
        Span::styled(format!("+{}%", (data.rebirth_bonus * 100.0).round() as u64), value),
    ]));
    lines.push("");

    let priced = |key: Text, offer: Offer, hotkey: char| -> String {
        match offer.cost() {
            Some(cost) => format!(
                " [{hotkey}] {}",
                fill(t(lang, key), &[("cost", format_number(cost).as_str()), ("bonus", "20")])
            ),
            None => format!(" [{hotkey}] {}", t(lang, Text::MaxLevel)),
        }
    };

    let cooldown = logic::cooldown_offer(data);
    lines.push_action(offer_line(priced(Text::UpgradeCooldown, cooldown, '1'), cooldown), actions::BUY_COOLDOWN);
    let damage = logic::damage_offer(data);
    lines.push_action(offer_line(priced(Text::UpgradeDamage, damage, '2'), damage), actions::BUY_DAMAGE);
    let rebirth = logic::rebirth_offer(data);
    lines.push_action(offer_line(priced(Text::Rebirth, rebirth, 'r'), rebirth), actions::REBIRTH);

    if game.cloud_enabled() {
        lines.push("");
        match game.session.user() {
            Some(user) => lines.push_action(
                Line::from(Span::styled(
                    format!(" [o] {} ({})", t(lang, Text::SignOut), user.user_id),
                    Style::default().fg(Color::Cyan),
                )),
                actions::SIGN_OUT,
            ),
            None => lines.push_action(
                Line::from(Span::styled(
                    format!(" [s] {}", t(lang, Text::SignIn)),
                    Style::default().fg(Color::Cyan),
                )),
                actions::SIGN_IN,
            ),
        }
    }

    lines.register(area, map, 1, 1);

    let border = if game.state.purchase_flash > 0 {
        Color::Yellow
    } else {
        Color::Green
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", t(lang, Text::ShopTab)));
    f.render_widget(Paragraph::new(lines.into_lines()).block(block), area);
}

fn render_notice(game: &MangoGame, f: &mut Frame, area: Rect) {
    let Some(notice) = &game.state.notice else {
        return;
    };
    let color = if notice.is_error {
        Color::LightRed
    } else {
        Color::LightGreen
    };
    f.render_widget(
        Paragraph::new(Span::styled(notice.text.as_str(), Style::default().fg(color)))
            .alignment(Alignment::Center),
        area,
    );
}

/// Centred box of at most `width` × `height` cells.
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

fn version_label(v: &VersionInfo) -> String {
    format!("{} ({})", v.name, v.code)
}

fn render_overlay(game: &MangoGame, overlay: &Overlay, f: &mut Frame, area: Rect, map: &mut ClickMap) {
    let lang = game.lang;
    let (title, body, buttons): (&str, Vec<Line>, [(String, u16); 2]) = match overlay {
        Overlay::RebirthConfirm => (
            t(lang, Text::RebirthConfirmTitle),
            vec![Line::from(rebirth_message(game))],
            [
                (format!("[y] {}", t(lang, Text::Yes)), actions::CONFIRM_YES),
                (format!("[n] {}", t(lang, Text::No)), actions::CONFIRM_NO),
            ],
        ),
        Overlay::SignInPrompt => (
            t(lang, Text::SignInTitle),
            vec![Line::from(t(lang, Text::SignInMessage))],
            [
                (format!("[s] {}", t(lang, Text::SignIn)), actions::SIGN_IN),
                (format!("[k] {}", t(lang, Text::Skip)), actions::SKIP_SIGN_IN),
            ],
        ),
        Overlay::UpdateAvailable(info) => (
            t(lang, Text::UpdateAvailable),
            update_body(game, info),
            [
                (format!("[d] {}", t(lang, Text::UpdateInstall)), actions::UPDATE_DOWNLOAD),
                (format!("[l] {}", t(lang, Text::UpdateLater)), actions::UPDATE_LATER),
            ],
        ),
    };

    let popup = popup_area(area, 46, 11);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightYellow))
        .title(format!(" {title} "));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    map.add(popup, actions::BLOCKED);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(buttons.len() as u16)])
        .split(inner);
    f.render_widget(Paragraph::new(body).wrap(Wrap { trim: true }), parts[0]);

    let mut button_lines = ActionLines::new();
    for (label, action) in buttons {
        button_lines.push_action(
            Line::from(Span::styled(
                format!(" {label}"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            action,
        );
    }
    button_lines.register(parts[1], map, 0, 0);
    f.render_widget(Paragraph::new(button_lines.into_lines()), parts[1]);
}

/// Confirmation text with the price and the bonus after this rebirth.
fn rebirth_message(game: &MangoGame) -> String {
    let count = game.state.data.rebirth_count;
    let cost = format_number(formulas::rebirth_cost(count));
    let bonus = (formulas::rebirth_bonus(count.saturating_add(1)) * 100.0).round() as u64;
    fill(
        t(game.lang, Text::RebirthConfirmMessage),
        &[("cost", cost.as_str()), ("bonus", bonus.to_string().as_str())],
    )
}

fn update_body<'a>(game: &MangoGame, info: &UpdateInfo) -> Vec<Line<'a>> {
    let lang = game.lang;
    let current = VersionInfo::current();
    let mut body = vec![
        Line::from(format!("{}: {}", t(lang, Text::UpdateCurrentVersion), version_label(&current))),
        Line::from(format!("{}: {}", t(lang, Text::UpdateNewVersion), version_label(&info.version))),
    ];
    if info.size > 0 {
        body.push(Line::from(format!(
            "{}: {} MB",
            t(lang, Text::UpdateSize),
            format_megabytes(info.size)
        )));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Lang;
    use crate::mango::save::MemoryStore;
    use crate::mango::session::Session;
    use ratzilla::ratatui::backend::TestBackend;
    use ratzilla::ratatui::Terminal;

    fn game() -> MangoGame {
        let mut store = MemoryStore::new();
        let session = Session::start(&mut store, None);
        MangoGame::new(Box::new(store), session, Lang::En, false)
    }

    /// Draw one 80×30 frame; returns the screen text and the hit regions.
    fn draw(game: &MangoGame) -> (String, ClickMap) {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut map = ClickMap::new();
        terminal
            .draw(|f| {
                let area = f.area();
                map.begin_frame(area.width, area.height);
                render(game, 0, f, area, &mut map);
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        (text, map)
    }

    fn has_target(map: &ClickMap, action: u16) -> bool {
        map.hitboxes.iter().any(|h| h.action == action)
    }

    #[test]
    fn clicker_tab_registers_mango_and_tabs() {
        let (text, map) = draw(&game());
        assert!(text.contains("Mangoes: 0"));
        assert!(has_target(&map, actions::TAP_MANGO));
        assert!(has_target(&map, actions::TAB_CLICKER));
        assert!(has_target(&map, actions::TAB_SHOP));
        assert!(!has_target(&map, actions::BUY_COOLDOWN));
    }

    #[test]
    fn shop_rows_are_tappable_with_prices() {
        let mut g = game();
        g.state.tab = Tab::Shop;
        g.state.data.clicks = 1_000;
        let (text, map) = draw(&g);

        assert!(text.contains("[1] Faster taps (130)"));
        assert!(text.contains("[r] Rebirth (+20%) (500K)"));
        for action in [actions::BUY_COOLDOWN, actions::BUY_DAMAGE, actions::REBIRTH] {
            assert!(has_target(&map, action), "missing target {action}");
        }
        assert!(!has_target(&map, actions::TAP_MANGO));
        // Cloud saves are off in this build, so no account row.
        assert!(!has_target(&map, actions::SIGN_IN));
    }

    #[test]
    fn maxed_upgrade_shows_max_level() {
        let mut g = game();
        g.state.tab = Tab::Shop;
        g.state.data.cooldown_level = formulas::MAX_COOLDOWN_LEVEL;
        let (text, _) = draw(&g);
        assert!(text.contains("[1] Max level reached"));
    }

    #[test]
    fn rebirth_dialog_shows_price_and_blocks_taps() {
        let mut g = game();
        g.state.data.rebirth_count = 1;
        g.state.data.clicks = formulas::rebirth_cost(1);
        g.state.overlay = Some(Overlay::RebirthConfirm);
        let (text, map) = draw(&g);

        assert!(text.contains("650K"));
        assert!(text.contains("+40%"));
        assert!(has_target(&map, actions::CONFIRM_YES));
        assert!(has_target(&map, actions::CONFIRM_NO));
        // The mango is under the popup's centre, but the popup wins.
        assert_eq!(map.hit(40, 14), Some(actions::BLOCKED));
    }

    #[test]
    fn popup_fits_small_screens() {
        let area = Rect::new(0, 0, 30, 8);
        let popup = popup_area(area, 46, 11);
        assert_eq!(popup, area);
        let popup = popup_area(Rect::new(0, 0, 80, 30), 46, 11);
        assert_eq!(popup, Rect::new(17, 9, 46, 11));
    }
}
