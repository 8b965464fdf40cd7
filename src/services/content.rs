//! Deterministic course-content derivation.
//!
//! Everything in this module is a pure function of the topic string: the
//! difficulty label, the icon, the module/lesson outline, the quiz and the
//! placeholder video list. The detail page applies it whenever the backend
//! returns a course shell without populated modules, so a freshly created
//! or still-generating course never renders empty.

use crate::models::course::{Course, Lesson, LessonType, Module, Quiz, QuizQuestion, VideoRef};

/// Static keyword-driven difficulty label for a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

const ADVANCED_KEYWORDS: &[&str] = &[
    "quantum",
    "machine learning",
    "neural",
    "deep learning",
    "cryptograph",
    "compiler",
    "distributed systems",
    "kernel",
    "thermodynamics",
    "relativity",
    "genomics",
    "calculus",
    "advanced",
];

const INTERMEDIATE_KEYWORDS: &[&str] = &[
    "programming",
    "algorithm",
    "statistics",
    "data analysis",
    "web development",
    "chemistry",
    "economics",
    "networking",
    "photography",
    "music theory",
    "linear algebra",
];

const BEGINNER_KEYWORDS: &[&str] = &[
    "introduction",
    "intro to",
    "basics",
    "beginner",
    "getting started",
    "101",
    "for everyone",
    "first steps",
];

/// Priority-ordered classification rules; the first set containing a
/// matching keyword wins, so an "advanced" hit beats a "beginner" hit even
/// when both appear (e.g. "Quantum Physics Fundamentals").
const DIFFICULTY_RULES: &[(&[&str], Difficulty)] = &[
    (ADVANCED_KEYWORDS, Difficulty::Advanced),
    (INTERMEDIATE_KEYWORDS, Difficulty::Intermediate),
    (BEGINNER_KEYWORDS, Difficulty::Beginner),
];

/// Classify a topic by testing its lowercased text against the ordered
/// keyword tables. Defaults to Intermediate when nothing matches.
pub fn classify_difficulty(topic: &str) -> Difficulty {
    let lowered = topic.to_lowercase();

    for (keywords, difficulty) in DIFFICULTY_RULES {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return *difficulty;
        }
    }

    Difficulty::Intermediate
}

const ICON_RULES: &[(&[&str], &str)] = &[
    (&["python", "programming", "coding", "software", "rust", "javascript"], "💻"),
    (&["math", "algebra", "calculus", "statistics", "geometry"], "📐"),
    (&["physics", "quantum", "astronomy", "space"], "🔭"),
    (&["chemistry", "biology", "science", "genomics"], "🧪"),
    (&["history", "geography", "civilization"], "🏛️"),
    (&["music", "guitar", "piano", "singing"], "🎵"),
    (&["art", "drawing", "painting", "design"], "🎨"),
    (&["language", "spanish", "french", "japanese", "english"], "🗣️"),
    (&["business", "marketing", "finance", "economics"], "📊"),
    (&["cooking", "baking", "cuisine"], "🍳"),
    (&["fitness", "yoga", "nutrition", "health"], "💪"),
    (&["photography", "camera", "film"], "📷"),
];

const DEFAULT_ICON: &str = "📚";

/// Pick a display icon for a topic from the ordered keyword table, falling
/// back to the generic book.
pub fn topic_icon(topic: &str) -> &'static str {
    let lowered = topic.to_lowercase();

    for (keywords, icon) in ICON_RULES {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return icon;
        }
    }

    DEFAULT_ICON
}

/// Topic shortcuts offered on the home page.
pub const SUGGESTED_TOPICS: &[&str] = &[
    "Python Programming",
    "Quantum Physics",
    "Digital Photography",
    "Spanish for Travelers",
    "Music Theory",
    "Personal Finance",
];

struct LessonTemplate {
    title: &'static str,
    duration: &'static str,
    lesson_type: LessonType,
    objective: &'static str,
    concepts: [&'static str; 2],
}

struct ModuleTemplate {
    title: &'static str,
    description: &'static str,
    lessons: [LessonTemplate; 4],
}

/// The fixed four-module, sixteen-lesson outline. `{}` interpolates the
/// title-cased topic.
const OUTLINE: [ModuleTemplate; 4] = [
    ModuleTemplate {
        title: "Foundations of {}",
        description: "Orient yourself: what {} covers, why it matters, and how this course is organized.",
        lessons: [
            LessonTemplate {
                title: "Welcome to {}",
                duration: "8 min",
                lesson_type: LessonType::Video,
                objective: "Understand what {} is and what you will be able to do by the end.",
                concepts: ["scope", "learning path"],
            },
            LessonTemplate {
                title: "{} in the Real World",
                duration: "10 min",
                lesson_type: LessonType::Video,
                objective: "See where {} shows up in practice and who relies on it.",
                concepts: ["applications", "motivation"],
            },
            LessonTemplate {
                title: "Essential Vocabulary",
                duration: "12 min",
                lesson_type: LessonType::Text,
                objective: "Learn the core terms practitioners of {} use every day.",
                concepts: ["terminology", "definitions"],
            },
            LessonTemplate {
                title: "Hands-On: First Steps",
                duration: "15 min",
                lesson_type: LessonType::Practice,
                objective: "Complete your first small exercise in {}.",
                concepts: ["setup", "practice"],
            },
        ],
    },
    ModuleTemplate {
        title: "Core Concepts",
        description: "The ideas every treatment of {} is built on, one building block at a time.",
        lessons: [
            LessonTemplate {
                title: "The Building Blocks of {}",
                duration: "10 min",
                lesson_type: LessonType::Video,
                objective: "Identify the fundamental components of {}.",
                concepts: ["components", "structure"],
            },
            LessonTemplate {
                title: "How the Pieces Fit Together",
                duration: "12 min",
                lesson_type: LessonType::Video,
                objective: "Trace how the parts of {} interact in a complete example.",
                concepts: ["relationships", "systems thinking"],
            },
            LessonTemplate {
                title: "Common Pitfalls and Misconceptions",
                duration: "9 min",
                lesson_type: LessonType::Text,
                objective: "Recognize the mistakes newcomers to {} make most often.",
                concepts: ["misconceptions", "debugging your understanding"],
            },
            LessonTemplate {
                title: "Checkpoint: Explain It Back",
                duration: "18 min",
                lesson_type: LessonType::Practice,
                objective: "Restate the core ideas of {} in your own words.",
                concepts: ["recall", "self-explanation"],
            },
        ],
    },
    ModuleTemplate {
        title: "Applied {}",
        description: "Move from understanding to doing with worked, realistic scenarios.",
        lessons: [
            LessonTemplate {
                title: "A Worked Example, Start to Finish",
                duration: "12 min",
                lesson_type: LessonType::Video,
                objective: "Follow one complete {} problem from framing to solution.",
                concepts: ["worked example", "process"],
            },
            LessonTemplate {
                title: "Tools of the Trade",
                duration: "14 min",
                lesson_type: LessonType::Video,
                objective: "Survey the tools practitioners of {} reach for first.",
                concepts: ["tooling", "workflow"],
            },
            LessonTemplate {
                title: "Patterns That Keep Appearing",
                duration: "10 min",
                lesson_type: LessonType::Text,
                objective: "Spot the recurring patterns that make new {} problems familiar.",
                concepts: ["patterns", "transfer"],
            },
            LessonTemplate {
                title: "Project: Apply What You Know",
                duration: "20 min",
                lesson_type: LessonType::Practice,
                objective: "Solve an unfamiliar {} problem end to end.",
                concepts: ["project work", "application"],
            },
        ],
    },
    ModuleTemplate {
        title: "Mastery and Next Steps",
        description: "Consolidate what you learned about {} and chart where to go next.",
        lessons: [
            LessonTemplate {
                title: "Advanced Perspectives",
                duration: "9 min",
                lesson_type: LessonType::Video,
                objective: "Preview the advanced areas of {} that open up from here.",
                concepts: ["frontiers", "depth"],
            },
            LessonTemplate {
                title: "Learning to Keep Learning",
                duration: "11 min",
                lesson_type: LessonType::Video,
                objective: "Build a sustainable practice routine for {}.",
                concepts: ["spaced practice", "habits"],
            },
            LessonTemplate {
                title: "Resources Worth Your Time",
                duration: "13 min",
                lesson_type: LessonType::Text,
                objective: "Curate the references that will serve you after this course on {}.",
                concepts: ["references", "community"],
            },
            LessonTemplate {
                title: "Putting It All Together",
                duration: "25 min",
                lesson_type: LessonType::Practice,
                objective: "Demonstrate everything this course on {} covered in one capstone review.",
                concepts: ["capstone", "review"],
            },
        ],
    },
];

/// Number of lessons the synthesized outline always contains.
pub const fn outline_lesson_count() -> usize {
    16
}

/// Whether a lesson id belongs to the synthesized outline, for validating
/// progress updates against courses the backend returned as shells.
pub fn outline_contains(lesson_id: &str) -> bool {
    lesson_id
        .strip_prefix('m')
        .and_then(|rest| rest.split_once("-l"))
        .map(|(module, lesson)| {
            matches!(
                (module.parse::<usize>(), lesson.parse::<usize>()),
                (Ok(m), Ok(l)) if (1..=4).contains(&m) && (1..=4).contains(&l)
            )
        })
        .unwrap_or(false)
}

/// Build the full derived outline for a topic: four modules, sixteen
/// lessons with stable ids, one placeholder video on each module's opening
/// lesson, and the quiz on the final lesson.
pub fn synthesize_course_content(topic: &str) -> Vec<Module> {
    let display = title_case(topic);
    let videos = synthesize_videos(topic);
    let quiz = synthesize_quiz(topic);

    OUTLINE
        .iter()
        .enumerate()
        .map(|(module_index, template)| {
            let lessons = template
                .lessons
                .iter()
                .enumerate()
                .map(|(lesson_index, lesson)| {
                    let is_final_lesson = module_index == OUTLINE.len() - 1
                        && lesson_index == template.lessons.len() - 1;

                    Lesson {
                        id: format!("m{}-l{}", module_index + 1, lesson_index + 1),
                        title: interpolate(lesson.title, &display),
                        duration: lesson.duration.to_string(),
                        lesson_type: lesson.lesson_type,
                        objectives: vec![interpolate(lesson.objective, &display)],
                        key_concepts: lesson.concepts.iter().map(|c| c.to_string()).collect(),
                        videos: if lesson_index == 0 {
                            videos.get(module_index).cloned().into_iter().collect()
                        } else {
                            Vec::new()
                        },
                        quiz: is_final_lesson.then(|| quiz.clone()),
                    }
                })
                .collect();

            Module {
                id: format!("m{}", module_index + 1),
                title: interpolate(template.title, &display),
                description: interpolate(template.description, &display),
                lessons,
            }
        })
        .collect()
}

/// Fill a shell course (no modules from the backend) with the derived
/// outline.
pub fn ensure_content(course: &mut Course) {
    if !course.has_content() {
        course.modules = synthesize_course_content(&course.topic);
    }
}

/// The fixed five-question quiz with the topic interpolated into each
/// prompt. Correct-answer indices are fixed by the template.
pub fn synthesize_quiz(topic: &str) -> Quiz {
    let display = title_case(topic);

    Quiz {
        questions: vec![
            QuizQuestion {
                prompt: format!("What is the primary goal of studying {display}?"),
                options: vec![
                    "Memorizing facts without context".to_string(),
                    "Building a working understanding you can apply".to_string(),
                    "Passing a single exam".to_string(),
                    "Collecting certificates".to_string(),
                ],
                correct_index: 1,
                explanation: "Durable, applicable understanding is the point; facts and credentials follow from it.".to_string(),
            },
            QuizQuestion {
                prompt: format!("Which habit most accelerates progress in {display}?"),
                options: vec![
                    "Cramming once a month".to_string(),
                    "Skipping the fundamentals".to_string(),
                    "Consistent, spaced practice".to_string(),
                    "Avoiding feedback".to_string(),
                ],
                correct_index: 2,
                explanation: "Short, regular sessions with feedback beat occasional marathons.".to_string(),
            },
            QuizQuestion {
                prompt: format!("You hit a difficult concept in {display}. What is the best first move?"),
                options: vec![
                    "Skip ahead and hope it clicks later".to_string(),
                    "Break it into smaller pieces and revisit the fundamentals".to_string(),
                    "Memorize it word for word".to_string(),
                    "Conclude the subject is not for you".to_string(),
                ],
                correct_index: 1,
                explanation: "Decomposing a hard idea usually reveals which underlying piece is missing.".to_string(),
            },
            QuizQuestion {
                prompt: format!("How should you test your understanding of {display}?"),
                options: vec![
                    "Explain it in your own words and apply it to a new problem".to_string(),
                    "Re-read the same notes".to_string(),
                    "Watch more videos passively".to_string(),
                    "Wait for the final exam".to_string(),
                ],
                correct_index: 0,
                explanation: "Explanation and transfer expose gaps that re-reading hides.".to_string(),
            },
            QuizQuestion {
                prompt: format!("What marks real mastery of {display}?"),
                options: vec![
                    "Finishing the course quickly".to_string(),
                    "Never making mistakes".to_string(),
                    "Recalling every definition".to_string(),
                    "Teaching it and applying it in unfamiliar situations".to_string(),
                ],
                correct_index: 3,
                explanation: "If you can teach it and use it somewhere new, you own it.".to_string(),
            },
        ],
    }
}

struct VideoTemplate {
    title: &'static str,
    channel: &'static str,
    duration: &'static str,
    query_suffix: &'static str,
}

const VIDEO_TEMPLATES: [VideoTemplate; 4] = [
    VideoTemplate {
        title: "{} Explained in 10 Minutes",
        channel: "QuickLearn",
        duration: "10:02",
        query_suffix: "explained",
    },
    VideoTemplate {
        title: "A Visual Introduction to {}",
        channel: "Visually",
        duration: "14:37",
        query_suffix: "visual introduction",
    },
    VideoTemplate {
        title: "{}: Common Mistakes to Avoid",
        channel: "The Practice Lab",
        duration: "9:48",
        query_suffix: "common mistakes",
    },
    VideoTemplate {
        title: "Deep Dive: {} for Serious Learners",
        channel: "Lecture Hall",
        duration: "28:15",
        query_suffix: "full course",
    },
];

/// The fixed four-entry placeholder video list. Links point at a video
/// search for the topic rather than fabricated video ids; thumbnails come
/// from a deterministic placeholder service.
pub fn synthesize_videos(topic: &str) -> Vec<VideoRef> {
    let display = title_case(topic);
    let slug = slugify(topic);

    VIDEO_TEMPLATES
        .iter()
        .enumerate()
        .map(|(index, template)| VideoRef {
            title: interpolate(template.title, &display),
            thumbnail_url: format!("https://placehold.co/320x180?text={}-{}", slug, index + 1),
            duration: template.duration.to_string(),
            channel: template.channel.to_string(),
            url: format!(
                "https://www.youtube.com/results?search_query={}+{}",
                slug.replace('-', "+"),
                template.query_suffix.replace(' ', "+")
            ),
        })
        .collect()
}

/// Spread a replacement video list across the modules' opening lessons,
/// used when the external video search is configured and succeeds.
pub fn distribute_videos(modules: &mut [Module], videos: Vec<VideoRef>) {
    let mut videos = videos.into_iter();

    for module in modules.iter_mut() {
        if let Some(first_lesson) = module.lessons.first_mut() {
            match videos.next() {
                Some(video) => first_lesson.videos = vec![video],
                None => break,
            }
        }
    }
}

fn interpolate(template: &str, display_topic: &str) -> String {
    template.replace("{}", display_topic)
}

/// Capitalize each word of a raw topic for interpolation into titles.
pub fn title_case(topic: &str) -> String {
    topic
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase, dash-separated form of a topic for deterministic URLs.
pub fn slugify(topic: &str) -> String {
    let mut slug = String::with_capacity(topic.len());
    let mut last_dash = true;

    for c in topic.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}
