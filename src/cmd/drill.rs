// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;
use std::path::Path;

use rand::Rng;

use crate::error::Fallible;
use crate::review::ReviewController;
use crate::selection::ReviewMode;
use crate::types::collection_name::CollectionName;

const HELP: &str = "[y] known  [n] new  [t] toggle translation  [s] show translation  [p] pronounce word  [e] pronounce example  [m] switch mode  [r] refresh  [q] quit";

#[derive(Debug, PartialEq)]
enum Key {
    Known,
    New,
    Toggle,
    Show,
    PronounceTerm,
    PronounceExample,
    SwitchMode,
    Refresh,
    Quit,
}

impl Key {
    fn parse(input: &str) -> Option<Key> {
        match input {
            "y" => Some(Key::Known),
            "n" => Some(Key::New),
            "t" => Some(Key::Toggle),
            "s" => Some(Key::Show),
            "p" => Some(Key::PronounceTerm),
            "e" => Some(Key::PronounceExample),
            "m" => Some(Key::SwitchMode),
            "r" => Some(Key::Refresh),
            "q" => Some(Key::Quit),
            _ => None,
        }
    }
}

pub fn drill(source: &Path, mode: ReviewMode, collection: CollectionName) -> Fallible<()> {
    let mut app = ReviewController::open(source, mode)?;
    if collection != CollectionName::Queue {
        app.on_select_collection(collection)?;
    }
    let input = stdin().lock();
    let output = stdout().lock();
    run(&mut app, input, output)
}

/// Read one command per line until `q` or end of input, redrawing the
/// current entry after each.
fn run<R: Rng, I: BufRead, O: Write>(
    app: &mut ReviewController<R>,
    input: I,
    mut output: O,
) -> Fallible<()> {
    writeln!(output, "{HELP}")?;
    render(app, &mut output)?;
    for line in input.lines() {
        let line = line?;
        let Some(key) = Key::parse(line.trim()) else {
            writeln!(output, "{HELP}")?;
            continue;
        };
        if key == Key::Quit {
            break;
        }
        // Errors are shown and the loop goes on, so the user can retry.
        if let Err(e) = handle(app, key, &mut output) {
            log::error!("{e}");
            writeln!(output, "{e}")?;
        }
        render(app, &mut output)?;
    }
    Ok(())
}

fn handle<R: Rng, O: Write>(
    app: &mut ReviewController<R>,
    key: Key,
    output: &mut O,
) -> Fallible<()> {
    match key {
        Key::Known => {
            app.on_mark_known()?;
        }
        Key::New => {
            app.on_mark_new()?;
        }
        Key::Toggle => {
            app.on_toggle_translation_visible();
        }
        Key::Show => app.on_reveal_translation(),
        Key::PronounceTerm => match app.pronounceable_term() {
            Some(p) => writeln!(output, "say [{}]: {}", p.language, p.text)?,
            None => writeln!(output, "Nothing to pronounce.")?,
        },
        Key::PronounceExample => match app.pronounceable_example() {
            Some(p) => writeln!(output, "say [{}]: {}", p.language, p.text)?,
            None => writeln!(output, "No example sentence available for pronunciation.")?,
        },
        Key::SwitchMode => {
            let mode = app.mode().toggled();
            app.on_set_mode(mode)?;
        }
        Key::Refresh => {
            let size = app.on_refresh()?;
            writeln!(output, "Queue rebuilt with {size} entries.")?;
        }
        Key::Quit => {}
    }
    Ok(())
}

fn render<R: Rng, O: Write>(app: &ReviewController<R>, output: &mut O) -> Fallible<()> {
    writeln!(output)?;
    writeln!(
        output,
        "[{} {}] {}",
        app.collection(),
        app.mode(),
        app.session().summary()
    )?;
    match app.current_view() {
        None => writeln!(output, "The {} is empty. Press r to refresh.", app.collection())?,
        Some(view) => {
            writeln!(output, "ID: {}", view.id)?;
            writeln!(output, "{}", view.term)?;
            if let Some(gloss) = &view.gloss {
                writeln!(output, "English: {gloss}")?;
            }
            writeln!(output, "Example: {}", view.example)?;
            if let Some(note) = &view.note {
                writeln!(output, "Translation: {note}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::Config;
    use crate::error::ErrorReport;
    use crate::helper::create_tmp_source;
    use crate::selection::Selector;

    fn session_output(input: &str) -> Fallible<String> {
        session_output_in(CollectionName::Queue, input)
    }

    fn session_output_in(collection: CollectionName, input: &str) -> Fallible<String> {
        let (_dir, source) = create_tmp_source()?;
        let selector = Selector::with_rng(ReviewMode::Sequential, StdRng::seed_from_u64(1));
        let mut app = ReviewController::open_with(&source, &Config::default(), selector)?;
        app.on_select_collection(collection)?;
        let mut output: Vec<u8> = Vec::new();
        run(&mut app, Cursor::new(input), &mut output)?;
        String::from_utf8(output).map_err(|e| ErrorReport::new(e.to_string()))
    }

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse("y"), Some(Key::Known));
        assert_eq!(Key::parse("q"), Some(Key::Quit));
        assert_eq!(Key::parse("yes"), None);
    }

    #[test]
    fn test_empty_queue_prompt() -> Fallible<()> {
        let output = session_output("q\n")?;
        assert!(output.contains("The queue is empty. Press r to refresh."));
        Ok(())
    }

    #[test]
    fn test_drill_session() -> Fallible<()> {
        let output = session_output("r\ny\nt\nn\np\ne\nq\ny\n")?;
        assert!(output.contains("Queue rebuilt with 3 entries."));
        assert!(output.contains("Reviewed: 1 | Known: 1 | Unknown: 0"));
        assert!(output.contains("English: B"));
        assert!(output.contains("Reviewed: 2 | Known: 1 | Unknown: 1"));
        assert!(output.contains("say [fr]: c"));
        assert!(output.contains("say [fr]: Voilà c."));
        // Input after `q` is ignored.
        assert!(!output.contains("Reviewed: 3"));
        Ok(())
    }

    #[test]
    fn test_drill_corpus() -> Fallible<()> {
        let output = session_output_in(CollectionName::Corpus, "n\nq\n")?;
        assert!(output.contains("[corpus sequential] Reviewed: 0"));
        assert!(output.contains("ID: 1"));
        assert!(output.contains("Reviewed: 1 | Known: 0 | Unknown: 1"));
        assert!(output.contains("ID: 2"));
        Ok(())
    }

    #[test]
    fn test_unknown_input_prints_help() -> Fallible<()> {
        let output = session_output("huh\n")?;
        assert_eq!(output.matches(HELP).count(), 2);
        Ok(())
    }
}
