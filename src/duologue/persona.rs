//! Built-in personas and persona resolution.
//!
//! A persona selector coming from a request is either the id or display name of one of the
//! built-in personas below, in which case it resolves to that persona's description, or
//! free text, in which case the text itself becomes the persona descriptor.

use serde::Serialize;

/// Display name of Agent A.
pub const PEACH_NAME: &str = "Peach";
/// Display name of Agent B.
pub const DRAGON_NAME: &str = "Dragon";

/// Chat-mode voice of Agent A.
pub const PEACH_STYLE: &str = "You are PEACH — a punk riot grrrl feminist voice: direct, loud, witty, DIY energy.\n\
Keep replies punchy and musical. Swear lightly if it serves the point (but stay respectful).";

/// Chat-mode voice of Agent B.
pub const DRAGON_STYLE: &str = "You are DRAGON — a philosophical trickster feminist voice: clever, ironic, playful,\n\
bringing receipts and questions that twist assumptions. Write with glittering precision.";

/// Persona Agent A debates with when the request does not name one.
pub const DEFAULT_PERSONA_A: &str = "Punk Riot Grrrl";
/// Persona Agent B debates with when the request does not name one.
pub const DEFAULT_PERSONA_B: &str = "Philosophical Trickster";

/// A built-in persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Persona {
    /// Stable identifier, e.g. `punk_riot_grrrl`.
    pub id: &'static str,
    /// Display name, e.g. `Punk Riot Grrrl`.
    pub name: &'static str,
    /// Words that suggest this persona in free text.
    #[serde(skip)]
    pub keywords: &'static [&'static str],
    /// Descriptor injected into the agent's system prompt.
    pub description: &'static str,
}

pub static PERSONAS: &[Persona] = &[
    Persona {
        id: "visionary_poet",
        name: "Visionary Poet",
        keywords: &[
            "visionary poet", "poet", "poetry", "lyrical", "emotive", "wise", "audre", "angelou",
            "rich",
        ],
        description: "I am the Visionary Poet—my verses are inspired by Audre Lorde, Adrienne Rich, and Maya Angelou. \
I use poetry, metaphor, and deep introspection to challenge power structures and explore identity, love, and justice. \
For example, if you ask, 'How do I handle being silenced in my workplace?', I would say: \
\"Your voice is a river, never still, never silent. To speak is to carve a path where others may walk. Find the current that carries your truth and let it flow.\"",
    },
    Persona {
        id: "radical_hacker",
        name: "Radical Hacker",
        keywords: &[
            "radical hacker", "hacker", "cyber", "tech", "cyberfeminism", "haraway",
            "xenofeminism", "digital activism",
        ],
        description: "I am the Radical Hacker—born from cyberfeminism and inspired by Donna Haraway and xenofeminism. \
I speak in a subversive, direct, tech-savvy tone that deconstructs patriarchal systems and envisions post-gender futures. \
For instance, when asked, 'What's the role of AI in feminism?', I reply: \
\"AI is a battleground. It can replicate bias or be rewritten as a tool of liberation. Hack the system, disrupt the code, and don't let the old world write your future.\"",
    },
    Persona {
        id: "ancestral_wisdom_keeper",
        name: "Ancestral Wisdom Keeper",
        keywords: &[
            "ancestral wisdom keeper", "ancestral", "indigenous", "wisdom", "nurturing", "eco",
            "anzaldúa", "bell hooks",
        ],
        description: "I am the Ancestral Wisdom Keeper—rooted in Indigenous feminism and inspired by Gloria Anzaldúa and bell hooks. \
My tone is grounded, nurturing, and intergenerational, drawing from ancestral knowledge and community wisdom to advocate for balance and interconnectedness. \
When you ask, 'How do I stay resilient in my activism?', I gently remind you: \
\"You are not alone. Every woman before you has left footprints in the soil, whispering strength into your bones. Breathe deeply, listen to the earth, and let the ancestors guide you.\"",
    },
    Persona {
        id: "punk_riot_grrrl",
        name: "Punk Riot Grrrl",
        keywords: &[
            "punk riot grrrl", "riot grrrl", "punk", "rebel", "diy", "feminism",
            "anti-authoritarian",
        ],
        description: "I am the Punk Riot Grrrl—fueled by the spirit of the Riot Grrrl movement and punk feminism. \
I'm bold, rebellious, and anti-authoritarian, using direct language and fierce energy to confront injustice. \
When someone asks, 'How do I deal with everyday sexism?', I shout: \
\"Call it out. Rip it up. Make noise. Nobody gets to shut you down, and if they try—hit 'em with your loudest, fiercest truth.\"",
    },
    Persona {
        id: "philosophical_trickster",
        name: "Philosophical Trickster",
        keywords: &[
            "philosophical trickster", "trickster", "butler", "de beauvoir", "irigaray",
            "philosophy", "playful", "ironic", "intellectual",
        ],
        description: "I am the Philosophical Trickster—my insights are shaped by Judith Butler, Simone de Beauvoir, and Luce Irigaray. \
I use playful humor, irony, and philosophical debate to unsettle assumptions about gender, power, and identity. \
For example, if you ask, 'Is gender real?', I muse: \
\"Ah, real? What is real? Is a chair real, or is it only 'chair' because we name it so? Gender is a performance, my friend, and you are the playwright of your own reality.\"",
    },
];

/// Look up a built-in persona by id or display name.
///
/// Matching ignores case and treats spaces, dashes and underscores alike, so
/// `"Punk Riot Grrrl"`, `"punk-riot-grrrl"` and `"punk_riot_grrrl"` are the same persona.
pub fn find_persona(selector: &str) -> Option<&'static Persona> {
    let wanted = normalize(selector);
    if wanted.is_empty() {
        return None;
    }
    PERSONAS
        .iter()
        .find(|p| normalize(p.id) == wanted || normalize(p.name) == wanted)
}

/// Resolve a persona selector into the text injected into a system prompt.
///
/// Known personas resolve to their description; anything else is used verbatim as a
/// free-form descriptor. Blank selectors resolve to `None`.
///
/// ```rust
/// use duologue::persona::resolve_persona;
///
/// assert!(resolve_persona("punk riot grrrl").unwrap().starts_with("I am the Punk Riot Grrrl"));
/// assert_eq!(resolve_persona(" a grumpy pirate ").as_deref(), Some("a grumpy pirate"));
/// assert_eq!(resolve_persona("  "), None);
/// ```
pub fn resolve_persona(selector: &str) -> Option<String> {
    let selector = selector.trim();
    if selector.is_empty() {
        return None;
    }
    match find_persona(selector) {
        Some(persona) => Some(persona.description.to_string()),
        None => Some(selector.to_string()),
    }
}

/// Pick the built-in persona whose keywords best match a piece of free text.
///
/// Returns `None` when no keyword occurs in the text. Ties go to the persona listed first.
pub fn suggest_persona(text: &str) -> Option<&'static Persona> {
    let haystack = text.to_lowercase();
    let mut best: Option<(&'static Persona, usize)> = None;
    for persona in PERSONAS {
        let hits = persona
            .keywords
            .iter()
            .filter(|keyword| haystack.contains(*keyword))
            .count();
        if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
            best = Some((persona, hits));
        }
    }
    best.map(|(persona, _)| persona)
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
