use crate::application::{App, AppMode, Stage};
use crate::domain::LetterField;
use crate::infrastructure::{BouquetGateway, GardenExporter, copy_to_clipboard};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(
        app: &mut App,
        gateway: &dyn BouquetGateway,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) {
        match app.mode {
            AppMode::Composing => Self::handle_composing_mode(app, gateway, key, modifiers),
            AppMode::Viewing => Self::handle_viewing_mode(app, gateway, key),
            AppMode::Garden => Self::handle_garden_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_composing_mode(
        app: &mut App,
        gateway: &dyn BouquetGateway,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('n') => {
                    app.next_stage();
                }
                KeyCode::Char('p') => {
                    app.previous_stage();
                }
                _ => {}
            }
            return;
        }

        if app.stage == Stage::Message {
            Self::handle_message_stage(app, key);
            return;
        }

        match key {
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.open_help();
                return;
            }
            KeyCode::Char('G') => {
                app.open_garden(gateway);
                return;
            }
            KeyCode::Right | KeyCode::Char('n') => {
                app.next_stage();
                return;
            }
            KeyCode::Left | KeyCode::Char('p') => {
                app.previous_stage();
                return;
            }
            _ => {}
        }

        match app.stage {
            Stage::Flowers => Self::handle_flowers_stage(app, key),
            Stage::Bundling => Self::handle_bundling_stage(app, key),
            Stage::Send => Self::handle_send_stage(app, gateway, key),
            Stage::Message => {}
        }
    }

    fn handle_flowers_stage(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous_flower(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_flower(),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('a') | KeyCode::Char('+') => {
                app.add_selected_flower();
            }
            KeyCode::Backspace | KeyCode::Delete | KeyCode::Char('x') | KeyCode::Char('-') => {
                app.remove_selected_flower();
            }
            _ => {}
        }
    }

    fn handle_bundling_stage(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('s') => app.shuffle_order(),
            KeyCode::Char('c') => app.cycle_greenery(),
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                app.toggle_wrapper_at(index);
            }
            _ => {}
        }
    }

    fn handle_message_stage(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                app.previous_stage();
            }
            KeyCode::Tab => app.next_letter_field(),
            KeyCode::Enter => {
                if app.letter_field == LetterField::Message {
                    app.type_letter_char('\n');
                } else {
                    app.next_letter_field();
                }
            }
            KeyCode::Backspace => app.delete_letter_char(),
            KeyCode::Char(c) => app.type_letter_char(c),
            _ => {}
        }
    }

    fn handle_send_stage(app: &mut App, gateway: &dyn BouquetGateway, key: KeyCode) {
        match key {
            KeyCode::Enter if app.share_link.is_none() => {
                if let Some(link) = app.submit(gateway) {
                    match copy_to_clipboard(&link.view_url) {
                        Ok(()) => {
                            app.status_message = Some(format!("Link copied: {}", link.view_url));
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "clipboard unavailable");
                        }
                    }
                }
            }
            KeyCode::Char('h') => app.go_home(),
            _ => {}
        }
    }

    fn handle_viewing_mode(app: &mut App, gateway: &dyn BouquetGateway, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('h') => app.go_home(),
            KeyCode::Char('G') => app.open_garden(gateway),
            KeyCode::F(1) | KeyCode::Char('?') => app.open_help(),
            _ => {}
        }
    }

    fn handle_garden_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('e') {
            let filename = app.garden_export_filename();
            let result = GardenExporter::export_to_csv(&app.garden, &app.catalog, &filename);
            app.set_export_result(result);
            return;
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous_garden_entry(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_garden_entry(),
            KeyCode::Enter => app.view_selected_garden_entry(),
            KeyCode::Esc | KeyCode::Char('h') => app.go_home(),
            KeyCode::F(1) | KeyCode::Char('?') => app.open_help(),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::FileGateway;
    use tempfile::TempDir;

    fn press(app: &mut App, gateway: &dyn BouquetGateway, key: KeyCode) {
        InputHandler::handle_key_event(app, gateway, key, KeyModifiers::NONE);
    }

    fn gateway(dir: &TempDir) -> FileGateway {
        FileGateway::new(dir.path().join("bouquets.json"))
    }

    #[test]
    fn test_flower_keys_add_and_remove() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        let mut app = App::default();

        press(&mut app, &gateway, KeyCode::Down);
        press(&mut app, &gateway, KeyCode::Enter);
        press(&mut app, &gateway, KeyCode::Char('a'));
        press(&mut app, &gateway, KeyCode::Char('x'));

        assert_eq!(app.selected_flower, 1);
        assert_eq!(app.store.total_flowers(), 1);
    }

    #[test]
    fn test_next_key_blocked_until_six_flowers() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        let mut app = App::default();

        press(&mut app, &gateway, KeyCode::Right);
        assert_eq!(app.stage, Stage::Flowers);

        for _ in 0..6 {
            press(&mut app, &gateway, KeyCode::Enter);
        }
        press(&mut app, &gateway, KeyCode::Right);
        assert_eq!(app.stage, Stage::Bundling);
    }

    #[test]
    fn test_bundling_keys() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        let mut app = App::default();
        for _ in 0..6 {
            app.add_selected_flower();
        }
        app.next_stage();

        press(&mut app, &gateway, KeyCode::Char('c'));
        press(&mut app, &gateway, KeyCode::Char('3'));
        press(&mut app, &gateway, KeyCode::Char('s'));

        let bouquet = app.store.bouquet();
        assert_eq!(bouquet.greenery.index(), 1);
        assert_eq!(bouquet.wrapper.as_deref(), Some("wrapper-3"));
        let mut order = bouquet.flower_order.clone();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_message_stage_types_letters_including_q() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        let mut app = App::default();
        for _ in 0..6 {
            app.add_selected_flower();
        }
        app.stage = Stage::Message;

        for c in "qi".chars() {
            press(&mut app, &gateway, KeyCode::Char(c));
        }
        press(&mut app, &gateway, KeyCode::Tab);
        press(&mut app, &gateway, KeyCode::Char('n'));
        press(&mut app, &gateway, KeyCode::Enter);
        press(&mut app, &gateway, KeyCode::Char('G'));

        let letter = &app.store.bouquet().letter;
        assert_eq!(letter.recipient, "qi");
        assert_eq!(letter.message, "n\nG");
        assert_eq!(app.letter_field, LetterField::Message);
        assert_eq!(app.mode, AppMode::Composing);
    }

    #[test]
    fn test_ctrl_navigation_from_message_stage() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        let mut app = App::default();
        for _ in 0..6 {
            app.add_selected_flower();
        }
        app.stage = Stage::Message;

        InputHandler::handle_key_event(
            &mut app,
            &gateway,
            KeyCode::Char('n'),
            KeyModifiers::CONTROL,
        );
        assert_eq!(app.stage, Stage::Send);
        press(&mut app, &gateway, KeyCode::Left);
        assert_eq!(app.stage, Stage::Message);
        press(&mut app, &gateway, KeyCode::Esc);
        assert_eq!(app.stage, Stage::Bundling);
    }

    #[test]
    fn test_send_stage_enter_creates_link_once() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        let mut app = App::default();
        for _ in 0..6 {
            app.add_selected_flower();
        }
        app.stage = Stage::Send;

        press(&mut app, &gateway, KeyCode::Enter);
        press(&mut app, &gateway, KeyCode::Enter);

        assert!(app.share_link.is_some());
        assert_eq!(gateway.list_all().unwrap().len(), 1);

        press(&mut app, &gateway, KeyCode::Char('h'));
        assert_eq!(app.stage, Stage::Flowers);
        assert_eq!(app.store.total_flowers(), 0);
    }

    #[test]
    fn test_resend_after_edit_creates_new_record() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        let mut app = App::default();
        for _ in 0..6 {
            app.add_selected_flower();
        }
        app.stage = Stage::Send;
        press(&mut app, &gateway, KeyCode::Enter);

        press(&mut app, &gateway, KeyCode::Left);
        press(&mut app, &gateway, KeyCode::Char('P'));
        InputHandler::handle_key_event(
            &mut app,
            &gateway,
            KeyCode::Char('n'),
            KeyModifiers::CONTROL,
        );
        press(&mut app, &gateway, KeyCode::Enter);

        assert_eq!(gateway.list_all().unwrap().len(), 2);
        let url = app.share_link.map(|link| link.view_url);
        assert_eq!(url.as_deref(), Some("http://localhost:3000/bouquet/2"));
    }

    #[test]
    fn test_garden_keys() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        let mut app = App::default();
        for _ in 0..6 {
            app.add_selected_flower();
        }
        app.submit(&gateway);

        press(&mut app, &gateway, KeyCode::Char('G'));
        assert_eq!(app.mode, AppMode::Garden);
        press(&mut app, &gateway, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Viewing);
        press(&mut app, &gateway, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Composing);
    }

    #[test]
    fn test_help_keys() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        let mut app = App::default();

        press(&mut app, &gateway, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, &gateway, KeyCode::PageDown);
        assert_eq!(app.help_scroll, 5);
        press(&mut app, &gateway, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Composing);
    }
}
