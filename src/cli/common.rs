//! Shared clap helper types for CLI commands.

use clap::ValueEnum;
use hallticket::{Program, Semester};

/// Programs accepted by `--program`.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ProgramArg {
    Bba,
    Mba,
    #[value(name = "bcom", alias = "b.com")]
    BCom,
    #[value(name = "mcom", alias = "m.com")]
    MCom,
    Bca,
    Mca,
}

impl From<ProgramArg> for Program {
    fn from(value: ProgramArg) -> Program {
        match value {
            ProgramArg::Bba => Program::Bba,
            ProgramArg::Mba => Program::Mba,
            ProgramArg::BCom => Program::BCom,
            ProgramArg::MCom => Program::MCom,
            ProgramArg::Bca => Program::Bca,
            ProgramArg::Mca => Program::Mca,
        }
    }
}

/// Semesters accepted by `--semester`.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SemesterArg {
    #[value(name = "1st", alias = "1")]
    First,
    #[value(name = "2nd", alias = "2")]
    Second,
    #[value(name = "3rd", alias = "3")]
    Third,
    #[value(name = "4th", alias = "4")]
    Fourth,
    #[value(name = "5th", alias = "5")]
    Fifth,
    #[value(name = "6th", alias = "6")]
    Sixth,
    #[value(name = "7th", alias = "7")]
    Seventh,
    #[value(name = "8th", alias = "8")]
    Eighth,
}

impl From<SemesterArg> for Semester {
    fn from(value: SemesterArg) -> Semester {
        let [first, second, third, fourth, fifth, sixth, seventh, eighth] = Semester::ALL;
        match value {
            SemesterArg::First => first,
            SemesterArg::Second => second,
            SemesterArg::Third => third,
            SemesterArg::Fourth => fourth,
            SemesterArg::Fifth => fifth,
            SemesterArg::Sixth => sixth,
            SemesterArg::Seventh => seventh,
            SemesterArg::Eighth => eighth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semester_arg_matches_label() {
        for (arg, label) in [
            (SemesterArg::First, "1st"),
            (SemesterArg::Third, "3rd"),
            (SemesterArg::Eighth, "8th"),
        ] {
            assert_eq!(Semester::from(arg).to_string(), label);
        }
    }

    #[test]
    fn test_program_arg_aliases() {
        assert!(matches!(
            ProgramArg::from_str("b.com", true),
            Ok(ProgramArg::BCom)
        ));
        assert_eq!(Program::from(ProgramArg::Mca).code(), "MCA");
    }
}
