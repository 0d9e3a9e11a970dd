//! Text menu driving the note service.
//!
//! # Responsibility
//! - Prompt, read and echo; every mutation goes through `NoteService`.
//! - Confirm destructive deletes before calling the core.
//!
//! # Invariants
//! - Core errors are printed and the loop continues.
//! - End of input behaves like choosing Exit (notes are saved).
//! - After a failed startup load, Exit does not save; only an explicit Save
//!   overwrites the notes file.

use notedesk_core::{
    Category, LoadSummary, Note, NoteEdit, NoteHit, NoteService, SearchQuery,
};
use std::fmt::Display;
use std::io::{self, BufRead, Write};

const RULE_WIDTH: usize = 50;
const CONTENT_TERMINATOR: &str = "END";

pub struct Menu<R, W> {
    input: R,
    output: W,
    service: NoteService,
    interactive: bool,
    save_on_exit: bool,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    /// `interactive` enables screen clearing and "press Enter" pauses.
    pub fn new(input: R, output: W, service: NoteService, interactive: bool) -> Self {
        Self {
            input,
            output,
            service,
            interactive,
            save_on_exit: true,
        }
    }

    #[cfg(test)]
    pub fn into_service(self) -> NoteService {
        self.service
    }

    /// Prints the startup load outcome.
    pub fn report_load(&mut self, summary: &LoadSummary) -> io::Result<()> {
        if summary.loaded > 0 {
            writeln!(self.output, "✓ Loaded {} note(s) from file.", summary.loaded)?;
        }
        for skipped in &summary.skipped {
            writeln!(
                self.output,
                "✗ Skipped line {}: {}",
                skipped.line, skipped.reason
            )?;
        }
        if let Some((announced, found)) = summary.truncated {
            writeln!(
                self.output,
                "✗ Notes file ended early: expected {announced} record(s), found {found}."
            )?;
        }
        Ok(())
    }

    /// Prints a failed startup load and turns off the save on Exit.
    pub fn report_load_error(&mut self, err: &impl Display) -> io::Result<()> {
        self.save_on_exit = false;
        writeln!(self.output, "✗ Error loading notes: {err}")?;
        writeln!(
            self.output,
            "  The notes file will not be saved on exit; choose 8 to overwrite it."
        )
    }

    /// Runs until Exit or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.clear_screen()?;
            self.print_main_menu()?;
            let Some(choice) = self.prompt_number("Enter your choice: ")? else {
                self.exit()?;
                return Ok(());
            };
            self.clear_screen()?;

            match choice {
                1 => self.create_note()?,
                2 => self.view_all()?,
                3 => self.view_details()?,
                4 => self.edit_note()?,
                5 => self.delete_note()?,
                6 => self.search_notes()?,
                7 => self.filter_by_category()?,
                8 => {
                    if self.save()? {
                        self.save_on_exit = true;
                        writeln!(self.output, "\n✓ Notes saved successfully!")?;
                    }
                }
                9 => {
                    self.exit()?;
                    return Ok(());
                }
                _ => writeln!(self.output, "\n✗ Invalid choice! Please try again.")?,
            }
            self.pause()?;
        }
    }

    fn print_main_menu(&mut self) -> io::Result<()> {
        self.heading("MAIN MENU")?;
        for line in [
            "  1. Create New Note",
            "  2. View All Notes",
            "  3. View Note Details",
            "  4. Edit Note",
            "  5. Delete Note",
            "  6. Search Notes",
            "  7. Filter by Category",
            "  8. Save Notes",
            "  9. Exit",
        ] {
            writeln!(self.output, "{line}")?;
        }
        self.rule('=')?;
        writeln!(self.output, "Total Notes: {}", self.service.list_notes().len())?;
        self.rule('=')
    }

    fn create_note(&mut self) -> io::Result<()> {
        self.heading("CREATE NEW NOTE")?;
        if self.service.store().is_full() {
            writeln!(self.output, "✗ Note storage is full! Cannot create more notes.")?;
            return Ok(());
        }

        let Some(title) = self.prompt_line("Enter note title: ")? else {
            return Ok(());
        };
        if title.trim().is_empty() {
            writeln!(self.output, "✗ Title cannot be empty!")?;
            return Ok(());
        }
        let content = self.read_content("\nEnter note content (type 'END' on a new line to finish):")?;
        if content.trim().is_empty() {
            writeln!(self.output, "✗ Content cannot be empty!")?;
            return Ok(());
        }

        writeln!(self.output, "\nSelect Category:")?;
        self.print_categories()?;
        let category = match self.prompt_number("Enter category number: ")? {
            Some(position) => match Category::from_position(position) {
                Some(category) => category,
                None => {
                    writeln!(self.output, "✗ Invalid category! Defaulting to PERSONAL.")?;
                    Category::Personal
                }
            },
            None => return Ok(()),
        };

        match self.service.create_note(title.clone(), content, category) {
            Ok(_) => {
                writeln!(self.output, "\n✓ Note created successfully!")?;
                writeln!(self.output, "  Title: {title}")?;
                writeln!(self.output, "  Category: {category}")
            }
            Err(err) => writeln!(self.output, "✗ {err}"),
        }
    }

    fn view_all(&mut self) -> io::Result<()> {
        self.heading("ALL NOTES")?;
        let lines = self
            .service
            .list_notes()
            .iter()
            .enumerate()
            .map(|(offset, note)| numbered(offset + 1, note))
            .collect::<Vec<_>>();
        if lines.is_empty() {
            return writeln!(self.output, "  No notes available.");
        }
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn view_details(&mut self) -> io::Result<()> {
        let Some(index) = self.select_note("\nEnter note number to view: ")? else {
            return Ok(());
        };
        let detail = match self.service.get_note_detail(index) {
            Ok(note) => note.render_detail(),
            Err(err) => return writeln!(self.output, "✗ {err}"),
        };
        self.heading("NOTE DETAILS")?;
        writeln!(self.output, "{detail}")?;
        self.rule('=')
    }

    fn edit_note(&mut self) -> io::Result<()> {
        let Some(index) = self.select_note("\nEnter note number to edit: ")? else {
            return Ok(());
        };
        if let Err(err) = self.service.get_note_detail(index) {
            return writeln!(self.output, "✗ {err}");
        }

        self.heading("EDIT NOTE")?;
        for line in ["  1. Edit Title", "  2. Edit Content", "  3. Edit Category", "  4. Cancel"] {
            writeln!(self.output, "{line}")?;
        }
        self.rule('=')?;

        let edit = match self.prompt_number("Enter your choice: ")? {
            Some(1) => match self.prompt_line("Enter new title: ")? {
                Some(title) if !title.trim().is_empty() => NoteEdit::Title(title),
                _ => return Ok(()),
            },
            Some(2) => {
                let content = self
                    .read_content("Enter new content (type 'END' on a new line to finish):")?;
                if content.trim().is_empty() {
                    return Ok(());
                }
                NoteEdit::Content(content)
            }
            Some(3) => {
                writeln!(self.output, "Select new category:")?;
                self.print_categories()?;
                match self
                    .prompt_number("Enter category number: ")?
                    .and_then(Category::from_position)
                {
                    Some(category) => NoteEdit::Category(category),
                    None => return Ok(()),
                }
            }
            Some(4) => return writeln!(self.output, "Edit cancelled."),
            Some(_) => return writeln!(self.output, "✗ Invalid choice!"),
            None => return Ok(()),
        };

        let label = match &edit {
            NoteEdit::Title(_) => "Title",
            NoteEdit::Content(_) => "Content",
            NoteEdit::Category(_) => "Category",
        };
        match self.service.edit_note(index, edit) {
            Ok(_) => writeln!(self.output, "✓ {label} updated successfully!"),
            Err(err) => writeln!(self.output, "✗ {err}"),
        }
    }

    fn delete_note(&mut self) -> io::Result<()> {
        let Some(index) = self.select_note("\nEnter note number to delete: ")? else {
            return Ok(());
        };
        if let Err(err) = self.service.get_note_detail(index) {
            return writeln!(self.output, "✗ {err}");
        }

        let confirm = self
            .prompt_line("Are you sure you want to delete this note? (yes/no): ")?
            .unwrap_or_default();
        if !confirm.trim().eq_ignore_ascii_case("yes") {
            return writeln!(self.output, "Deletion cancelled.");
        }
        match self.service.delete_note(index) {
            Ok(_) => writeln!(self.output, "✓ Note deleted successfully!"),
            Err(err) => writeln!(self.output, "✗ {err}"),
        }
    }

    fn search_notes(&mut self) -> io::Result<()> {
        if self.service.list_notes().is_empty() {
            return writeln!(self.output, "\n✗ No notes available.");
        }
        let Some(keyword) = self.prompt_line("\nEnter search keyword: ")? else {
            return Ok(());
        };
        if keyword.trim().is_empty() {
            return writeln!(self.output, "✗ Search keyword cannot be empty!");
        }

        let lines = match self.service.search_notes(&SearchQuery::lenient(keyword.as_str())) {
            Ok(hits) => render_hits(&hits),
            Err(err) => return writeln!(self.output, "✗ {err}"),
        };
        self.heading("SEARCH RESULTS")?;
        if lines.is_empty() {
            return writeln!(self.output, "  No notes found matching '{keyword}'");
        }
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn filter_by_category(&mut self) -> io::Result<()> {
        if self.service.list_notes().is_empty() {
            return writeln!(self.output, "\n✗ No notes available.");
        }
        self.heading("FILTER BY CATEGORY")?;
        self.print_categories()?;
        let Some(position) = self.prompt_number("Select category: ")? else {
            return Ok(());
        };
        let Some(category) = Category::from_position(position) else {
            return writeln!(self.output, "✗ Invalid category!");
        };

        let lines = render_hits(&self.service.filter_notes(category));
        self.heading(&format!("Notes in category: {category}"))?;
        if lines.is_empty() {
            return writeln!(self.output, "  No notes in this category.");
        }
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        self.clear_screen()?;
        if self.save_on_exit {
            self.save()?;
        } else {
            writeln!(
                self.output,
                "✗ Notes were not saved: the notes file failed to load at startup."
            )?;
        }
        writeln!(self.output, "\n✓ Thank you for using notedesk!")
    }

    /// Saves to the configured file; returns whether it succeeded.
    fn save(&mut self) -> io::Result<bool> {
        match self.service.save() {
            Ok(()) => Ok(true),
            Err(err) => {
                writeln!(self.output, "✗ Error saving notes: {err}")?;
                Ok(false)
            }
        }
    }

    /// Lists notes and asks for one; `None` when there is nothing to pick.
    fn select_note(&mut self, prompt: &str) -> io::Result<Option<usize>> {
        if self.service.list_notes().is_empty() {
            writeln!(self.output, "\n✗ No notes available.")?;
            return Ok(None);
        }
        self.view_all()?;
        self.prompt_number(prompt)
    }

    fn print_categories(&mut self) -> io::Result<()> {
        for (offset, category) in Category::ALL.iter().enumerate() {
            writeln!(self.output, "  {}. {category}", offset + 1)?;
        }
        Ok(())
    }

    fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.output)?;
        self.rule('=')?;
        writeln!(self.output, "{title:^RULE_WIDTH$}")?;
        self.rule('=')
    }

    fn rule(&mut self, ch: char) -> io::Result<()> {
        writeln!(self.output, "{}", ch.to_string().repeat(RULE_WIDTH))
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        if self.interactive {
            write!(self.output, "\x1b[H\x1b[2J")?;
            self.output.flush()?;
        }
        Ok(())
    }

    fn pause(&mut self) -> io::Result<()> {
        if self.interactive {
            write!(self.output, "\nPress Enter to continue...")?;
            self.output.flush()?;
            self.read_line()?;
        }
        Ok(())
    }

    /// Re-prompts until a number is entered; `None` on end of input.
    fn prompt_number(&mut self, prompt: &str) -> io::Result<Option<usize>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            match line.trim().parse::<usize>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "✗ Invalid input! Please enter a number.")?,
            }
        }
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Reads lines until `END` (or end of input); each line keeps its newline.
    fn read_content(&mut self, prompt: &str) -> io::Result<String> {
        writeln!(self.output, "{prompt}")?;
        let mut content = String::new();
        while let Some(line) = self.read_line()? {
            if line == CONTENT_TERMINATOR {
                break;
            }
            content.push_str(&line);
            content.push('\n');
        }
        Ok(content)
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

fn numbered(index: usize, note: &Note) -> String {
    format!("  {index}. {}", note.render())
}

fn render_hits(hits: &[NoteHit<'_>]) -> Vec<String> {
    hits.iter().map(|hit| numbered(hit.index, hit.note)).collect()
}

#[cfg(test)]
mod tests {
    use super::Menu;
    use notedesk_core::{Category, NoteFile, NoteService};
    use std::fs;
    use std::io::Cursor;

    fn run_script(service: NoteService, script: &str) -> (NoteService, String) {
        let mut output = Vec::new();
        let mut menu = Menu::new(Cursor::new(script.as_bytes()), &mut output, service, false);
        menu.run().unwrap();
        let service = menu.into_service();
        (service, String::from_utf8(output).unwrap())
    }

    #[test]
    fn create_list_and_exit_writes_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = NoteService::new(NoteFile::new(dir.path().join("notes.txt")));
        let script = "1\nTeam Meeting\nagenda item\nEND\n2\n2\n9\n";

        let (service, output) = run_script(service, script);
        assert!(output.contains("✓ Note created successfully!"));
        assert!(output.contains("  1. [Work] Team Meeting - Created: "));
        assert!(output.contains("Thank you"));

        let saved = std::fs::read_to_string(service.data_file()).unwrap();
        assert!(saved.starts_with("1\nTeam Meeting|agenda item\\n|WORK|"));
    }

    #[test]
    fn failed_startup_load_keeps_the_file_on_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "not-a-number\nkeep me\n").unwrap();
        let mut service = NoteService::new(NoteFile::new(&path));
        let err = service.reload().unwrap_err();

        let mut output = Vec::new();
        let mut menu = Menu::new(Cursor::new(b"9\n".as_slice()), &mut output, service, false);
        menu.report_load_error(&err).unwrap();
        menu.run().unwrap();
        drop(menu);

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("✗ Error loading notes:"));
        assert!(output.contains("✗ Notes were not saved"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "not-a-number\nkeep me\n");
    }

    #[test]
    fn explicit_save_after_failed_load_overwrites_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "not-a-number\n").unwrap();
        let mut service = NoteService::new(NoteFile::new(&path));
        let err = service.reload().unwrap_err();

        let mut output = Vec::new();
        let mut menu = Menu::new(Cursor::new(b"8\n9\n".as_slice()), &mut output, service, false);
        menu.report_load_error(&err).unwrap();
        menu.run().unwrap();
        drop(menu);

        assert_eq!(fs::read_to_string(&path).unwrap(), "0\n");
    }

    #[test]
    fn non_numeric_choice_reprompts() {
        let dir = tempfile::tempdir().unwrap();
        let service = NoteService::new(NoteFile::new(dir.path().join("notes.txt")));

        let (_, output) = run_script(service, "abc\n9\n");
        assert!(output.contains("✗ Invalid input! Please enter a number."));
    }

    #[test]
    fn delete_requires_yes_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = NoteService::new(NoteFile::new(dir.path().join("notes.txt")));
        service.create_note("a", "x\n", Category::Ideas).unwrap();

        let (service, output) = run_script(service, "5\n1\nno\n5\n1\nYES\n9\n");
        assert!(output.contains("Deletion cancelled."));
        assert!(output.contains("✓ Note deleted successfully!"));
        assert!(service.list_notes().is_empty());
    }

    #[test]
    fn invalid_category_defaults_to_personal_and_eof_saves() {
        let dir = tempfile::tempdir().unwrap();
        let service = NoteService::new(NoteFile::new(dir.path().join("notes.txt")));

        let (service, output) = run_script(service, "1\nT\nbody\nEND\n42\n");
        assert!(output.contains("Defaulting to PERSONAL"));
        assert_eq!(
            service.get_note_detail(1).unwrap().category(),
            Category::Personal
        );
        assert!(service.data_file().exists());
    }

    #[test]
    fn malformed_search_keyword_is_matched_literally() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = NoteService::new(NoteFile::new(dir.path().join("notes.txt")));
        service
            .create_note("[draft] essay", "x\n", Category::School)
            .unwrap();

        let (_, output) = run_script(service, "6\n[draft\n9\n");
        assert!(output.contains("  1. [School] [draft] essay"));
    }
}
