//! Category-conditioned answer phrasing.
//!
//! A stored answer is wrapped in one of several templates for its category,
//! picked at random so repeated questions don't read identically. The random
//! source is passed in, which keeps rendering deterministic under a seeded
//! generator.

use dlm_core::Category;
use dlm_db::{KnowledgeEntry, StoredCategory};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::warn;

pub const MISSING_CATEGORY_MESSAGE: &str =
    "Sorry, I encountered an error on my end. Please try again later.";
pub const UNRECOGNIZED_CATEGORY_MESSAGE: &str = "Cannot retrieve and generate response due to data in an unfamiliar category. Please try again later.";

/// "I don't know yet" replies for recall misses and unsolvable compute queries.
pub const FALLBACK_RESPONSES: &[&str] = &[
    "Hmm, that's a great question! I might need more context or details to answer it.",
    "I'm still training my brain on that topic. Could you clarify what you mean?",
    "Oops! That one's not in my database yet, or maybe it's phrased in a way I don't recognize!",
    "You got me this time! Could you try rewording it so I can understand better?",
    "That's a tough one! I might need a bit more information to figure it out.",
    "I don't have the answer just yet, but I bet it's out there somewhere! Could you rephrase it?",
    "Hmm... I'll have to hit the books for that one! Or maybe I just need a little more context?",
    "I haven't learned that yet, but I'm constantly improving! Maybe try a different wording?",
    "You just stumped me! But no worries, I'm always evolving. Maybe I misinterpreted the question?",
    "That's outside my knowledge base for now, or maybe I'm just not parsing it right!",
    "I wish I had the answer! If it's incomplete, could you add more details?",
    "I'm not sure about that one. Maybe try breaking it down into smaller parts?",
    "Hmm, I don't have an answer yet. Could you reword or give more details?",
    "Still learning this one! If something's missing, feel free to add more context.",
    "I don't have that in my knowledge bank yet, or maybe I'm missing part of the question!",
];

const AFFIRMATIVE_LEADS: &[&str] = &[
    "Yes",
    "Absolutely",
    "Certainly",
    "Indeed",
    "That's right",
    "Correct",
    "You got it",
    "Sure thing",
    "Of course",
    "Definitely",
    "Without a doubt",
    "That's true",
    "Affirmative",
    "Right on",
    "You're spot on",
    "Exactly",
    "Totally",
    "No question about it",
    "100%",
    "I agree",
];

const NEGATIVE_LEADS: &[&str] = &[
    "No",
    "Not at all",
    "Unfortunately",
    "Of course not",
    "That's not correct",
    "Actually, no",
    "I'm afraid not",
    "Nope",
    "Sorry, but no",
    "That's not the case",
    "Negative",
    "Not quite",
    "That's incorrect",
    "I'm sorry",
    "Absolutely not",
    "Nah",
    "Doesn't seem so",
    "I wouldn't say that",
    "No way",
    "That's a no",
];

/// Leading words that make a yes/no answer negative.
const NEGATION_MARKERS: &[&str] = &["no", "not", "don't", "dont", "never", "cannot"];

const PROCESS_TEMPLATES: &[&str] = &[
    "To get started, {first}. Then, {second}. Finally, {third}.",
    "First, {first}. Next, {second}. Lastly, {third}.",
    "Begin by {first}. After that, {second}. Don't forget to {third}.",
    "Start with {first}. Continue by {second}. Finish by {third}.",
    "Initially, {first}. Then proceed to {second}. End with {third}.",
    "Kick things off by {first}. Follow it up with {second}. Conclude by {third}.",
    "Your first step is to {first}. The second step is to {second}. The final step is to {third}.",
    "Commence by {first}. Subsequently, {second}. Ultimately, {third}.",
    "Start off by {first}. Then move on to {second}. Finally, make sure you {third}.",
    "Begin with {first}. Then take care of {second}. Lastly, ensure you {third}.",
];

const PARTIAL_PROCESS: &str = "I only have part of that process: {answer}";

const DEFINITION_TRIGGERS: &[&str] = &[
    "what",
    "definition",
    "define",
    "meaning",
    "interpret",
    "what's",
    "whats",
    "does",
    "mean",
    "means",
    "could",
    "you",
    "explain",
    "describe",
    "clarify",
    "tell",
    "me",
    "give",
    "the",
    "of",
    "in",
    "other",
    "words",
];

const DEFINITION_TEMPLATES: &[&str] = &[
    "\"{term}\" refers to {answer}",
    "By definition, \"{term}\" is {answer}",
    "In simple terms, \"{term}\" means {answer}",
    "\"{term}\" can be described as {answer}",
    "The term \"{term}\" stands for {answer}",
    "Essentially, \"{term}\" is {answer}",
    "\"{term}\" is understood as {answer}",
    "In other words, \"{term}\" is {answer}",
    "To put it simply, \"{term}\" refers to {answer}",
    "\"{term}\" typically means {answer}",
    "When we say \"{term}\", we're talking about {answer}",
    "\"{term}\" represents {answer}",
    "\"{term}\" is defined as {answer}",
    "You can think of \"{term}\" as {answer}",
];

const DEADLINE_TRIGGERS: &[&str] = &[
    "when", "what", "what's", "whats", "when's", "whens", "is", "the", "a", "an", "deadline",
    "due", "cutoff", "closing", "by", "before", "until", "date", "day", "last", "latest", "final",
];

const DEADLINE_TEMPLATES: &[&str] = &[
    "The deadline for \"{term}\" is {answer}",
    "You need to submit \"{term}\" by {answer}",
    "Make sure to complete \"{term}\" by {answer}",
    "\"{term}\" is due on {answer}",
    "Don't forget, \"{term}\" must be done by {answer}",
    "\"{term}\" has a due date of {answer}",
    "Be sure to finish \"{term}\" before {answer}",
    "Please submit \"{term}\" no later than {answer}",
    "\"{term}\" needs to be turned in by {answer}",
    "The final date to complete \"{term}\" is {answer}",
    "Submission for \"{term}\" closes on {answer}",
    "You have until {answer} to complete \"{term}\"",
    "\"{term}\" is expected to be submitted by {answer}",
    "\"{term}\" must be handed in by {answer}",
    "The cutoff for \"{term}\" is {answer}",
];

const LOCATION_TEMPLATES: &[&str] = &[
    "You can find it at {answer}",
    "It's located at {answer}",
    "Head over to {answer} for more information",
    "Check it out at {answer}",
    "Access it via {answer}",
    "You'll find it here: {answer}",
    "It's available at {answer}",
    "Navigate to {answer} to view it",
    "You can reach it at {answer}",
    "Visit {answer} to learn more",
    "Take a look at {answer}",
    "More details can be found at {answer}",
    "For further info, go to {answer}",
    "To see it yourself, just go to {answer}",
];

const ELIGIBILITY_TEMPLATES: &[&str] = &[
    "Eligibility means {answer}",
    "Eligibility requires that {answer}",
    "Qualifications are met only if {answer}",
    "To be eligible, {answer}",
    "Meeting eligibility involves {answer}",
    "You qualify only if {answer}",
    "Eligibility is based on whether {answer}",
    "In order to qualify, {answer}",
    "You are eligible when {answer}",
    "The requirements are satisfied if {answer}",
    "Eligibility depends on {answer}",
    "To meet the qualifications, {answer}",
    "Being eligible implies that {answer}",
    "You're considered eligible if {answer}",
    "Eligibility conditions include {answer}",
];

fn pick<'t, R: Rng + ?Sized>(templates: &'t [&'static str], rng: &mut R) -> &'t str {
    templates.choose(rng).copied().unwrap_or_default()
}

/// Phrase a stored entry for its category.
pub fn render<R: Rng + ?Sized>(entry: &KnowledgeEntry, rng: &mut R) -> String {
    match entry.category() {
        StoredCategory::Known(category) => {
            render_category(category, &entry.question, &entry.answer, rng)
        }
        StoredCategory::Missing => {
            warn!("entry {:?} has no category", entry.question);
            MISSING_CATEGORY_MESSAGE.to_string()
        }
        StoredCategory::Unrecognized(text) => {
            warn!("entry {:?} has unknown category {:?}", entry.question, text);
            UNRECOGNIZED_CATEGORY_MESSAGE.to_string()
        }
    }
}

pub fn render_category<R: Rng + ?Sized>(
    category: Category,
    question: &str,
    answer: &str,
    rng: &mut R,
) -> String {
    match category {
        Category::Generic => answer.to_string(),
        Category::YesNo => render_yes_no(answer, rng),
        Category::Process => render_process(answer, rng),
        Category::Definition => pick(DEFINITION_TEMPLATES, rng)
            .replace("{term}", &subject_term(question, DEFINITION_TRIGGERS))
            .replace("{answer}", answer),
        Category::Deadline => pick(DEADLINE_TEMPLATES, rng)
            .replace("{term}", &subject_term(question, DEADLINE_TRIGGERS))
            .replace("{answer}", answer),
        Category::Location => pick(LOCATION_TEMPLATES, rng).replace("{answer}", &answer.to_lowercase()),
        Category::Eligibility => {
            pick(ELIGIBILITY_TEMPLATES, rng).replace("{answer}", &answer.to_lowercase())
        }
    }
}

/// A random "I don't know yet" reply.
pub fn fallback<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FALLBACK_RESPONSES.choose(rng).copied().unwrap_or_default()
}

fn is_negative(answer: &str) -> bool {
    let lowered = answer.trim().to_lowercase();
    if lowered.starts_with("do not") {
        return true;
    }
    let first = lowered
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_end_matches(|c: char| c.is_ascii_punctuation() && c != '\'');
    NEGATION_MARKERS.contains(&first)
}

/// Drop a leading "yes"/"no" and the punctuation after it.
fn strip_polarity(answer: &str) -> &str {
    let trimmed = answer.trim();
    let word_end = trimmed
        .find(|c: char| !c.is_alphabetic())
        .unwrap_or(trimmed.len());
    let word = &trimmed[..word_end];
    if word.eq_ignore_ascii_case("yes") || word.eq_ignore_ascii_case("no") {
        trimmed[word_end..].trim_start_matches([',', '.', '!', ' '])
    } else {
        trimmed
    }
}

fn render_yes_no<R: Rng + ?Sized>(answer: &str, rng: &mut R) -> String {
    let leads = if is_negative(answer) {
        NEGATIVE_LEADS
    } else {
        AFFIRMATIVE_LEADS
    };
    let lead = pick(leads, rng);
    let rest = strip_polarity(answer);
    if rest.is_empty() {
        format!("{lead}.")
    } else {
        format!("{lead}, {rest}")
    }
}

fn render_process<R: Rng + ?Sized>(answer: &str, rng: &mut R) -> String {
    let steps: Vec<&str> = answer.split("; ").collect();
    let [first, second, third, ..] = steps.as_slice() else {
        return PARTIAL_PROCESS.replace("{answer}", answer);
    };
    pick(PROCESS_TEMPLATES, rng)
        .replace("{first}", first.trim_end_matches('.'))
        .replace("{second}", second.trim_end_matches('.'))
        .replace("{third}", third.trim_end_matches('.'))
}

/// The question minus its trigger words; the whole question if nothing is left.
fn subject_term(question: &str, triggers: &[&str]) -> String {
    let term = question
        .split_whitespace()
        .filter(|w| !triggers.contains(&w.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ");
    if term.is_empty() {
        question.trim().to_string()
    } else {
        term
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn entry(question: &str, answer: &str, category: Category) -> KnowledgeEntry {
        KnowledgeEntry::new(question, answer, category)
    }

    #[test]
    fn test_generic_is_verbatim() {
        let e = entry("fafsa", "Free Application for Federal Student Aid", Category::Generic);
        assert_eq!(render(&e, &mut rng()), "Free Application for Federal Student Aid");
    }

    #[test]
    fn test_yes_no_polarity_and_strip() {
        let mut rng = rng();
        for _ in 0..20 {
            let text = render_yes_no("yes, it is free", &mut rng);
            let lead = text.strip_suffix(", it is free").expect(&text);
            assert!(AFFIRMATIVE_LEADS.contains(&lead), "{text}");

            let text = render_yes_no("No, you must reapply", &mut rng);
            let lead = text.strip_suffix(", you must reapply").expect(&text);
            assert!(NEGATIVE_LEADS.contains(&lead), "{text}");
        }
    }

    #[test]
    fn test_negation_markers() {
        assert!(is_negative("not after june"));
        assert!(is_negative("Don't bother"));
        assert!(is_negative("do not apply twice"));
        assert!(is_negative("never"));
        assert!(is_negative("Cannot be done"));
        assert!(!is_negative("nothing is required"));
        assert!(!is_negative("yes"));
    }

    #[test]
    fn test_bare_yes_keeps_only_the_lead() {
        let text = render_yes_no("Yes", &mut rng());
        assert!(text.ends_with('.'));
        assert!(AFFIRMATIVE_LEADS.contains(&text.trim_end_matches('.')));
    }

    #[test]
    fn test_process_needs_three_steps() {
        let text = render_process("fill form; submit", &mut rng());
        assert_eq!(text, "I only have part of that process: fill form; submit");

        let text = render_process("", &mut rng());
        assert_eq!(text, "I only have part of that process: ");
    }

    #[test]
    fn test_process_uses_first_three_steps() {
        let text = render_process(
            "create an account; fill the form; submit it; wait",
            &mut rng(),
        );
        assert!(text.contains("create an account"));
        assert!(text.contains("fill the form"));
        assert!(text.contains("submit it"));
        assert!(!text.contains("wait"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn test_definition_recovers_term() {
        let e = entry(
            "what definition photosynthesis",
            "the process plants use to make food",
            Category::Definition,
        );
        let text = render(&e, &mut rng());
        assert!(text.contains("\"photosynthesis\""), "{text}");
        assert!(text.contains("the process plants use to make food"));
    }

    #[test]
    fn test_deadline_recovers_term() {
        let e = entry("when fafsa deadline", "June 30th 2025", Category::Deadline);
        let text = render(&e, &mut rng());
        assert!(text.contains("\"fafsa\""), "{text}");
        assert!(text.contains("June 30th 2025"));
    }

    #[test]
    fn test_term_falls_back_to_question() {
        assert_eq!(subject_term("what deadline", DEADLINE_TRIGGERS), "what deadline");
    }

    #[test]
    fn test_location_and_eligibility_lowercase_answer() {
        let e = entry("where apply", "The FAFSA.gov Website", Category::Location);
        assert!(render(&e, &mut rng()).contains("the fafsa.gov website"));

        let e = entry("who eligible", "You Must Be Enrolled", Category::Eligibility);
        assert!(render(&e, &mut rng()).contains("you must be enrolled"));
    }

    #[test]
    fn test_bad_categories_render_fixed_messages() {
        let mut e = entry("q", "a", Category::Generic);
        e.category_text = String::new();
        assert_eq!(render(&e, &mut rng()), MISSING_CATEGORY_MESSAGE);

        e.category_text = "recipe".to_string();
        assert_eq!(render(&e, &mut rng()), UNRECOGNIZED_CATEGORY_MESSAGE);
    }

    #[test]
    fn test_seeded_rendering_is_repeatable() {
        let e = entry("where apply", "fafsa.gov", Category::Location);
        assert_eq!(render(&e, &mut rng()), render(&e, &mut rng()));
        assert!(FALLBACK_RESPONSES.contains(&fallback(&mut rng())));
    }
}
