//! The Gusto symposium lineup.

use super::event::{AdmissionMode, Category, Event, TimeSlot, Track};
use super::pass::Pass;
use rust_decimal::Decimal;

pub const DEFAULT_PASS_ID: &str = "all-access";

#[allow(clippy::too_many_arguments)]
fn event(
    id: &str,
    title: &str,
    category: Category,
    admission_mode: AdmissionMode,
    track: Track,
    time_slot: TimeSlot,
    venue: &str,
    time: &str,
    description: &str,
    rules: &[&str],
    submission_email: Option<&str>,
) -> Event {
    Event {
        id: id.to_string(),
        title: title.to_string(),
        category,
        admission_mode,
        track,
        time_slot,
        venue: venue.to_string(),
        time: time.to_string(),
        description: description.to_string(),
        rules: rules.iter().map(|r| r.to_string()).collect(),
        submission_email: submission_email.map(str::to_string),
    }
}

pub fn events() -> Vec<Event> {
    use AdmissionMode::*;
    use Category::*;

    vec![
        event(
            "paper-presentation",
            "Paper Presentation",
            Technical,
            Abstract,
            Track::A,
            TimeSlot::Slot1015,
            "Seminar Hall 1",
            "10:15 AM",
            "Present original research to a panel of faculty judges.",
            &["Teams of up to 3", "Abstract must be submitted before the deadline", "8 minutes + 2 minutes Q&A"],
            Some("papers.gusto@gmail.com"),
        ),
        event(
            "project-expo",
            "Project Expo",
            Technical,
            Abstract,
            Track::B,
            TimeSlot::Slot1015,
            "Main Lobby",
            "10:15 AM",
            "Demo a working hardware or software project.",
            &["Teams of up to 4", "Bring your own hardware", "Abstract shortlisting applies"],
            Some("expo.gusto@gmail.com"),
        ),
        event(
            "code-sprint",
            "Code Sprint",
            Technical,
            Direct,
            Track::A,
            TimeSlot::Slot1100,
            "Lab 3",
            "11:00 AM",
            "Timed competitive programming round.",
            &["Individual event", "C, C++, Java or Python", "No internet access"],
            None,
        ),
        event(
            "debug-duel",
            "Debug Duel",
            Technical,
            Direct,
            Track::C,
            TimeSlot::Slot1015,
            "Lab 1",
            "10:15 AM",
            "Find and fix the bugs before your opponent does.",
            &["Teams of 2", "Languages announced on the spot"],
            None,
        ),
        event(
            "icon-iq",
            "Icon IQ",
            NonTechnical,
            Direct,
            Track::B,
            TimeSlot::Slot1100,
            "Seminar Hall 2",
            "11:00 AM",
            "Guess the brand, the logo and the person behind it.",
            &["Teams of up to 2", "Mobile phones are not allowed"],
            None,
        ),
        event(
            "meme-hunt",
            "Meme Hunt",
            NonTechnical,
            Direct,
            Track::C,
            TimeSlot::Slot1100,
            "Open Air Theatre",
            "11:00 AM",
            "A campus-wide scavenger hunt driven by meme clues.",
            &["Teams of up to 4", "Clues are released every 10 minutes"],
            None,
        ),
        event(
            "shutter-story",
            "Shutter Story",
            NonTechnical,
            Submission,
            Track::A,
            TimeSlot::Online,
            "Online",
            "Submit by event day",
            "Tell a story in five photographs.",
            &["Individual event", "Minimal editing only", "Original work only"],
            Some("photos.gusto@gmail.com"),
        ),
        event(
            "reel-rush",
            "Reel Rush",
            NonTechnical,
            Submission,
            Track::B,
            TimeSlot::Online,
            "Online",
            "Submit by event day",
            "A 60-second reel on the symposium theme.",
            &["Individual event", "Maximum 60 seconds", "No copyrighted audio"],
            Some("reels.gusto@gmail.com"),
        ),
    ]
}

pub fn passes() -> Vec<Pass> {
    vec![
        Pass {
            id: "solo".to_string(),
            name: "Solo Pass".to_string(),
            price: Decimal::new(150, 0),
            max_total: 1,
            max_technical: 1,
            max_non_technical: 1,
        },
        Pass {
            id: "duo".to_string(),
            name: "Duo Pass".to_string(),
            price: Decimal::new(250, 0),
            max_total: 2,
            max_technical: 1,
            max_non_technical: 1,
        },
        Pass {
            id: DEFAULT_PASS_ID.to_string(),
            name: "All Access Pass".to_string(),
            price: Decimal::new(400, 0),
            max_total: 4,
            max_technical: 2,
            max_non_technical: 3,
        },
    ]
}
