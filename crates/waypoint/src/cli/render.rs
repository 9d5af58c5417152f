use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use waypointapp::commands::{CmdMessage, CmdResult, MessageLevel};
use waypointapp::geocode::PlaceCandidate;
use waypointapp::model::Location;
use waypointapp::view::DisplayLocation;

const LINE_WIDTH: usize = 100;
const COUNTRY_WIDTH: usize = 20;
const COORD_WIDTH: usize = 22;
const QUIZ_MARKER: &str = "?";

/// Prints everything a command returned: locations first, then places, then messages.
pub(super) fn print_result(result: &CmdResult) {
    if !result.listed_locations.is_empty() {
        print_locations(&result.listed_locations);
    }
    if !result.places.is_empty() {
        print_places(&result.places);
    }
    if let Some(config) = &result.config {
        print_pairs(&config.entries());
    }
    print_messages(&result.messages);
}

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_locations(entries: &[DisplayLocation]) {
    let idx_width = entries
        .iter()
        .map(|e| format!("{}. ", e.index).width())
        .max()
        .unwrap_or(0);

    for entry in entries {
        let idx_str = format!("{}. ", entry.index);
        let idx_padding = idx_width - idx_str.width();

        let marker = if entry.location.question_count() > 0 {
            format!("{} ", QUIZ_MARKER)
        } else {
            "  ".to_string()
        };

        let fixed = 2 + idx_width + marker.width() + COUNTRY_WIDTH + COORD_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let title = truncate_to_width(&entry.location.title, available);
        let title_padding = available.saturating_sub(title.width());

        let country = truncate_to_width(&entry.location.country, COUNTRY_WIDTH);
        let country_padding = COUNTRY_WIDTH.saturating_sub(country.width());

        println!(
            "  {}{}{}{}{}{}{}{}",
            " ".repeat(idx_padding),
            idx_str.yellow(),
            title.bold(),
            " ".repeat(title_padding),
            marker.cyan(),
            country,
            " ".repeat(country_padding),
            entry.location.coordinates.to_string().dimmed()
        );
    }
}

pub(super) fn print_location_detail(entry: &DisplayLocation) {
    let location = &entry.location;
    println!(
        "{} {}",
        entry.index.to_string().yellow(),
        location.title.bold()
    );
    println!("--------------------------------");
    print_field("id", &location.id);
    print_field("country", &location.country);
    print_field("coordinates", &location.coordinates.to_string());
    if !location.image.is_empty() {
        print_field("image", &location.image);
    }
    if let Some(video) = &location.video {
        print_field("video", video);
    }
    if let Some(audio) = &location.audio {
        print_field("audio", audio);
    }
    println!();
    println!("{}", location.description);
    print_quiz(location);
}

fn print_quiz(location: &Location) {
    let Some(questions) = location.questions.as_deref() else {
        return;
    };
    if questions.is_empty() {
        return;
    }

    println!();
    let heading = if location.block_navigation == Some(true) {
        "Quiz (must be answered to continue)"
    } else {
        "Quiz"
    };
    println!("{}", heading.bold());
    for (i, question) in questions.iter().enumerate() {
        println!(
            "  {}. {} {}",
            i + 1,
            question.text,
            format!("[{}]", question.kind).dimmed()
        );
        for option in question.options.iter().flatten() {
            let bullet = if *option == question.answer { "*" } else { "-" };
            println!("     {} {}", bullet, option);
        }
        println!("     {} {}", "answer:".dimmed(), question.answer.green());
    }
}

pub(super) fn print_places(places: &[PlaceCandidate]) {
    for (i, place) in places.iter().enumerate() {
        let idx_str = format!("{}. ", i + 1);
        let available = LINE_WIDTH.saturating_sub(2 + idx_str.width() + COORD_WIDTH);
        let name = truncate_to_width(&place.name, available);
        let padding = available.saturating_sub(name.width());
        println!(
            "  {}{}{}{}",
            idx_str.yellow(),
            name,
            " ".repeat(padding),
            place.coordinates.to_string().dimmed()
        );
    }
}

pub(super) fn print_pairs(pairs: &[(&str, String)]) {
    let key_width = pairs.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    for (key, value) in pairs {
        println!(
            "{}{} = {}",
            key.cyan(),
            " ".repeat(key_width - key.width()),
            value
        );
    }
}

fn print_field(name: &str, value: &str) {
    println!("{:>12}  {}", name.dimmed(), value);
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_are_untouched() {
        assert_eq!(truncate_to_width("Petra", 10), "Petra");
        assert_eq!(truncate_to_width("", 10), "");
    }

    #[test]
    fn long_strings_end_with_ellipsis() {
        let out = truncate_to_width("Wadi Rum Protected Area", 10);
        assert_eq!(out, "Wadi Rum …");
        assert_eq!(out.width(), 10);
    }

    #[test]
    fn wide_characters_count_double() {
        let out = truncate_to_width("東京タワー展望台", 7);
        assert!(out.width() <= 7);
        assert!(out.ends_with('…'));
    }
}
