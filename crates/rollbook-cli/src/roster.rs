use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rollbook_models::{RosterEntry, StudentId};

/// A class of `students` fake pupils with sequential roll numbers.
pub fn sample_roster(students: usize) -> Vec<RosterEntry> {
    (1..=students)
        .map(|roll| {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();

            RosterEntry {
                student_id: StudentId::new(),
                display_name: format!("{} {}", first, last),
                roll_number: format!("{:03}", roll),
            }
        })
        .collect()
}
