// 📋 Console Menu - numbered actions over the loaded registry

use estate_register::{Listing, ListingRegistry};
use std::io::{self, BufRead, Write};

/// The interactive console menu.
///
/// All reading and writing goes through the generic `run_with`, so tests
/// can drive the whole loop with in-memory buffers. [`run`] wires it to
/// stdin/stdout for the binary.
pub struct Menu<'a> {
    registry: &'a ListingRegistry,
}

impl<'a> Menu<'a> {
    pub fn new(registry: &'a ListingRegistry) -> Self {
        Menu { registry }
    }

    /// Show the menu until the user exits or input runs dry.
    pub fn run_with<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<()> {
        loop {
            writeln!(output)?;
            writeln!(output, "1. Show all listings (newest first)")?;
            writeln!(output, "2. Filter listings by cost range")?;
            writeln!(output, "3. Exit")?;
            write!(output, "Select an option: ")?;
            output.flush()?;

            let choice = match read_line(input)? {
                Some(line) => line,
                None => break, // end of input counts as exit
            };

            match choice.trim() {
                "1" => self.show_sorted(output)?,
                "2" => self.run_cost_filter(input, output)?,
                "3" => break,
                _ => writeln!(output, "❌ Invalid choice, enter 1, 2 or 3")?,
            }
        }

        Ok(())
    }

    fn show_sorted<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let listings = self.registry.sorted_by_date_desc();
        display_listings(output, "All listings, newest first:", &listings)
    }

    fn run_cost_filter<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<()> {
        let min = match prompt_non_negative_int(input, output, "Minimum cost: ")? {
            Some(value) => value,
            None => return Ok(()),
        };

        // Keep asking for the maximum until it makes a usable range.
        let max = loop {
            let candidate = match prompt_non_negative_int(input, output, "Maximum cost: ")? {
                Some(value) => value,
                None => return Ok(()),
            };
            if candidate >= min {
                break candidate;
            }
            writeln!(output, "❌ Maximum must be at least {}", min)?;
        };

        let title = format!("Listings costing {} to {} руб.:", min, max);
        let hits = self.registry.filter_by_cost(min, max);
        display_listings(output, &title, &hits)
    }
}

/// Run the menu on stdin/stdout.
pub fn run(registry: &ListingRegistry) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    Menu::new(registry).run_with(&mut input, &mut output)
}

// ============================================================================
// PROMPT HELPERS
// ============================================================================

/// One line of input, or `None` once the input is exhausted.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf))
}

/// Prompt until the user types a plain non-negative number.
///
/// Only ASCII digit strings pass, so signs, decimals, and stray words all
/// re-prompt instead of half-parsing. `None` means the input ended.
fn prompt_non_negative_int<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<i64>> {
    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(None),
        };

        let text = line.trim();
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = text.parse::<i64>() {
                return Ok(Some(value));
            }
        }

        writeln!(output, "❌ Enter a whole non-negative number")?;
    }
}

fn display_listings<W: Write>(
    output: &mut W,
    title: &str,
    listings: &[Listing],
) -> io::Result<()> {
    writeln!(output)?;
    writeln!(output, "{}", title)?;

    if listings.is_empty() {
        writeln!(output, "  (nothing to show)")?;
        return Ok(());
    }

    for listing in listings {
        writeln!(output, "  {}", listing)?;
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn listing(owner: &str, cost: i64, y: i32, m: u32, d: u32) -> Listing {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Listing::new(owner, cost, date).unwrap()
    }

    fn sample_registry() -> ListingRegistry {
        ListingRegistry::new(vec![
            listing("Иванов И.И.", 5_400_000, 2022, 1, 15),
            listing("Петров П.П.", 30_000_000, 2023, 5, 20),
            listing("Сидоров А.А.", 67_000_000, 2021, 11, 30),
        ])
    }

    fn run_menu(registry: &ListingRegistry, keystrokes: &str) -> String {
        let mut input = Cursor::new(keystrokes.as_bytes().to_vec());
        let mut output = Vec::new();

        Menu::new(registry)
            .run_with(&mut input, &mut output)
            .unwrap();

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_exit_immediately() {
        let registry = sample_registry();
        let output = run_menu(&registry, "3\n");

        assert!(output.contains("1. Show all listings"));
        assert!(output.contains("3. Exit"));
    }

    #[test]
    fn test_show_all_sorted_by_date() {
        let registry = sample_registry();
        let output = run_menu(&registry, "1\n3\n");

        let petrov = output.find("Петров П.П.").unwrap();
        let ivanov = output.find("Иванов И.И.").unwrap();
        let sidorov = output.find("Сидоров А.А.").unwrap();

        // Newest registration first.
        assert!(petrov < ivanov);
        assert!(ivanov < sidorov);
        assert!(output.contains("Петров П.П. | 2023.05.20 | 30000000 руб."));
    }

    #[test]
    fn test_invalid_choice_shows_error_and_continues() {
        let registry = sample_registry();
        let output = run_menu(&registry, "9\n3\n");

        assert!(output.contains("❌ Invalid choice"));
        // The menu came back after the error.
        assert!(output.matches("Select an option:").count() >= 2);
    }

    #[test]
    fn test_cost_filter_inclusive_bounds() {
        let registry = sample_registry();
        let output = run_menu(&registry, "2\n5400000\n30000000\n3\n");

        assert!(output.contains("Иванов И.И."));
        assert!(output.contains("Петров П.П."));
        assert!(!output.contains("Сидоров А.А."));
    }

    #[test]
    fn test_cost_filter_exact_match() {
        let registry = sample_registry();
        let output = run_menu(&registry, "2\n5400000\n5400000\n3\n");

        assert!(output.contains("Иванов И.И. | 2022.01.15 | 5400000 руб."));
        assert!(!output.contains("Петров П.П."));
    }

    #[test]
    fn test_cost_filter_empty_result() {
        let registry = sample_registry();
        let output = run_menu(&registry, "2\n0\n5000000\n3\n");

        assert!(output.contains("(nothing to show)"));
    }

    #[test]
    fn test_non_numeric_input_reprompts() {
        let registry = sample_registry();
        let output = run_menu(&registry, "2\nabc\n-5\n12.5\n0\n5000000\n3\n");

        // One complaint per rejected entry: word, sign, decimal.
        assert_eq!(
            output.matches("❌ Enter a whole non-negative number").count(),
            3
        );
        assert!(output.contains("(nothing to show)"));
    }

    #[test]
    fn test_max_below_min_reprompts_for_max() {
        let registry = sample_registry();
        let output = run_menu(&registry, "2\n1000000\n500\n67000000\n3\n");

        assert!(output.contains("❌ Maximum must be at least 1000000"));
        // After the corrected maximum the filter ran.
        assert!(output.contains("Иванов И.И."));
        assert!(output.contains("Сидоров А.А."));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let registry = sample_registry();

        // No input at all.
        let output = run_menu(&registry, "");
        assert!(output.contains("Select an option:"));

        // Input ends mid-filter.
        let output = run_menu(&registry, "2\n100\n");
        assert!(output.contains("Maximum cost: "));
    }
}
