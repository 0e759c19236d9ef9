//! Static curriculum catalog.
//!
//! Chapters are keyed by (subject, standard); there is no dynamic
//! creation. The topic lists under each chapter are generated at runtime
//! and live in the state store, not here.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Chapters for one (subject, standard) pair.
struct Course {
    subject: &'static str,
    standard: &'static str,
    chapters: &'static [&'static str],
}

const COURSES: &[Course] = &[
    Course {
        subject: "Mathematics",
        standard: "Class 9",
        chapters: &[
            "Number Systems",
            "Polynomials",
            "Linear Equations in Two Variables",
            "Triangles",
            "Statistics",
        ],
    },
    Course {
        subject: "Mathematics",
        standard: "Class 10",
        chapters: &[
            "Real Numbers",
            "Quadratic Equations",
            "Arithmetic Progressions",
            "Trigonometry",
            "Probability",
        ],
    },
    Course {
        subject: "Science",
        standard: "Class 9",
        chapters: &[
            "Matter in Our Surroundings",
            "The Fundamental Unit of Life",
            "Motion",
            "Gravitation",
            "Sound",
        ],
    },
    Course {
        subject: "Science",
        standard: "Class 10",
        chapters: &[
            "Chemical Reactions and Equations",
            "Life Processes",
            "Electricity",
            "Light: Reflection and Refraction",
            "Our Environment",
        ],
    },
    Course {
        subject: "Computer Science",
        standard: "Class 9",
        chapters: &[
            "Basics of Information Technology",
            "Cyber Safety",
            "Office Tools",
            "Scratch Programming",
        ],
    },
    Course {
        subject: "Computer Science",
        standard: "Class 10",
        chapters: &[
            "Python Basics",
            "Functions",
            "Data Types and Operators",
            "Flow of Control",
            "Introduction to Databases",
        ],
    },
    Course {
        subject: "English",
        standard: "Class 9",
        chapters: &["The Fun They Had", "The Sound of Music", "The Little Girl"],
    },
    Course {
        subject: "English",
        standard: "Class 10",
        chapters: &["A Letter to God", "Nelson Mandela", "Two Stories about Flying"],
    },
];

static INDEX: Lazy<BTreeMap<(&'static str, &'static str), &'static [&'static str]>> =
    Lazy::new(|| {
        COURSES
            .iter()
            .map(|c| ((c.subject, c.standard), c.chapters))
            .collect()
    });

/// All subjects, in catalog order without duplicates.
pub fn subjects() -> Vec<&'static str> {
    let mut out = Vec::new();
    for course in COURSES {
        if !out.contains(&course.subject) {
            out.push(course.subject);
        }
    }
    out
}

/// Standards available for a subject.
pub fn standards_for(subject: &str) -> Vec<&'static str> {
    let mut out = Vec::new();
    for course in COURSES {
        if course.subject == subject && !out.contains(&course.standard) {
            out.push(course.standard);
        }
    }
    out
}

/// Chapters for a (subject, standard) pair, if the course exists.
pub fn chapters_for(subject: &str, standard: &str) -> Option<&'static [&'static str]> {
    INDEX.get(&(subject, standard)).copied()
}
