use anyhow::Result;
use console::{Key, Term, style};
use dialoguer::{Input, Password};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Back,
    Quit,
    Index(usize),
    Invalid,
}

fn print_header(header: &[String]) {
    for line in header {
        println!("{}", line);
    }
}

/// Numbered menu. The first key decides the input mode: arrows switch to
/// in-place selection, anything else falls back to typed input.
pub fn prompt_menu(
    prompt: &str,
    items: &[&str],
    default: Option<usize>,
    header: &[String],
) -> Result<MenuChoice> {
    let term = Term::stdout();
    let _ = term.clear_screen();

    print_header(header);
    println!("{}", prompt);
    for (i, it) in items.iter().enumerate() {
        println!("{}: {}", i + 1, it);
    }
    println!("Type a number + Enter, or use arrow keys + Enter. 'b' = back, 'q' = quit.");

    match term.read_key()? {
        Key::ArrowUp | Key::ArrowDown | Key::Home | Key::End | Key::PageUp | Key::PageDown => {
            arrow_select(prompt, items, default, header)
        }
        Key::Char('q') | Key::Char('Q') => Ok(MenuChoice::Quit),
        Key::Char('b') | Key::Char('B') | Key::Escape => Ok(MenuChoice::Back),
        Key::Enter => Ok(default.map(MenuChoice::Index).unwrap_or(MenuChoice::Invalid)),
        Key::Char(c) if !c.is_control() => {
            let input = typed_selection(Some(c))?;
            Ok(parse_selection(&input, items.len(), default))
        }
        _ => {
            let input = typed_selection(None)?;
            Ok(parse_selection(&input, items.len(), default))
        }
    }
}

/// Show a block per entry and ask for an entry number.
pub fn prompt_pane(prompt: &str, blocks: &[Vec<String>], header: &[String]) -> Result<MenuChoice> {
    let term = Term::stdout();
    let _ = term.clear_screen();

    print_header(header);
    for block in blocks {
        for line in block {
            println!("{}", line);
        }
        println!();
    }
    println!("{}", prompt);

    let input = typed_selection(None)?;
    Ok(parse_selection(&input, blocks.len(), None))
}

/// Blocking message box: shown until a key is pressed.
pub fn show_modal(title: &str, message: &str) -> Result<()> {
    let term = Term::stdout();
    println!();
    println!("{}", style(format!("[ {} ]", title)).red().bold());
    println!("{}", message);
    println!("{}", style("Press any key to continue.").dim());
    term.read_key()?;
    Ok(())
}

pub fn show_status(header: &[String]) {
    let _ = Term::stdout().clear_screen();
    print_header(header);
}

pub fn prompt_text(prompt: &str, current: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

/// Hidden input. `None` means "leave unchanged".
pub fn prompt_secret(prompt: &str) -> Result<Option<String>> {
    let value = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

pub fn prompt_page_size(current: u8) -> Result<u8> {
    let value: u8 = Input::new()
        .with_prompt("Page size (1-100)")
        .default(current)
        .validate_with(|v: &u8| -> Result<(), &'static str> {
            if (1..=100).contains(v) {
                Ok(())
            } else {
                Err("page size must be between 1 and 100")
            }
        })
        .interact_text()?;
    Ok(value)
}

fn typed_selection(first: Option<char>) -> Result<String> {
    let mut builder = Input::new().with_prompt("Selection").allow_empty(true);
    if let Some(c) = first {
        builder = builder.with_initial_text(c.to_string());
    }
    let input: String = builder.interact_text()?;
    Ok(input)
}

pub fn parse_selection(input: &str, count: usize, default: Option<usize>) -> MenuChoice {
    let s = input.trim();
    if s.is_empty() {
        return default.map(MenuChoice::Index).unwrap_or(MenuChoice::Back);
    }
    if s.eq_ignore_ascii_case("q") {
        return MenuChoice::Quit;
    }
    if s.eq_ignore_ascii_case("b") {
        return MenuChoice::Back;
    }
    match s.parse::<usize>() {
        Ok(idx) if idx >= 1 && idx <= count => MenuChoice::Index(idx - 1),
        _ => MenuChoice::Invalid,
    }
}

fn arrow_select(
    prompt: &str,
    items: &[&str],
    default: Option<usize>,
    header: &[String],
) -> Result<MenuChoice> {
    let term = Term::stdout();
    let mut sel = default.unwrap_or(0).min(items.len().saturating_sub(1));
    let mut top: usize = 0;
    loop {
        term.clear_screen()?;
        print_header(header);
        println!("{}", prompt);

        let (rows_u16, _cols_u16) = term.size();
        // header + prompt + help
        let reserved = 2 + header.len();
        let max_visible = (rows_u16 as usize)
            .saturating_sub(reserved)
            .max(3)
            .min(items.len());

        // keep selection in viewport
        if sel < top {
            top = sel;
        }
        if sel >= top + max_visible {
            top = sel + 1 - max_visible;
        }

        let end = (top + max_visible).min(items.len());
        for i in top..end {
            let marker = if i == sel { ">" } else { " " };
            println!("{} {}: {}", marker, i + 1, items[i]);
        }
        println!("Use arrows + Enter. 'b' = back, 'q' = quit.");

        let step = max_visible.saturating_sub(1).max(1);
        match term.read_key()? {
            Key::ArrowUp => sel = sel.saturating_sub(1),
            Key::ArrowDown => {
                if sel + 1 < items.len() {
                    sel += 1;
                }
            }
            Key::Home => sel = 0,
            Key::End => sel = items.len().saturating_sub(1),
            Key::PageUp => sel = sel.saturating_sub(step),
            Key::PageDown => sel = (sel + step).min(items.len().saturating_sub(1)),
            Key::Enter => return Ok(MenuChoice::Index(sel)),
            Key::Char('q') | Key::Char('Q') => return Ok(MenuChoice::Quit),
            Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(MenuChoice::Back),
            _ => {}
        }
    }
}
