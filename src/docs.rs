use utoipa::OpenApi;

use rollbook_calendar::{CustomPick, DateRange};
use rollbook_models::{
    AttendancePatch, AttendanceStatus, AttendanceSummary, Frequency, SessionTerms,
    StudentAttendance, Term, TermDateRange, TermDates,
};

use crate::modules::calendar::model::{CurrentTermResponse, ResolveQuery};
use crate::modules::wizard::model::{
    SetClassDto, SetFrequencyDto, SetSessionDto, SetTermDto, StudentRecordView, WizardDraft,
    WizardStep, WizardView,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::wizard::controller::open_wizard,
        crate::modules::wizard::controller::get_wizard,
        crate::modules::wizard::controller::cancel_wizard,
        crate::modules::wizard::controller::reset_wizard,
        crate::modules::wizard::controller::advance_wizard,
        crate::modules::wizard::controller::back_wizard,
        crate::modules::wizard::controller::submit_wizard,
        crate::modules::wizard::controller::set_class,
        crate::modules::wizard::controller::set_session,
        crate::modules::wizard::controller::set_term,
        crate::modules::wizard::controller::set_frequency,
        crate::modules::wizard::controller::set_custom_range,
        crate::modules::wizard::controller::update_record,
        crate::modules::wizard::controller::mark_all_present,
        crate::modules::calendar::controller::list_sessions,
        crate::modules::calendar::controller::current_term,
        crate::modules::calendar::controller::resolve_range,
    ),
    components(
        schemas(
            WizardView,
            WizardStep,
            WizardDraft,
            StudentRecordView,
            SetClassDto,
            SetSessionDto,
            SetTermDto,
            SetFrequencyDto,
            CustomPick,
            AttendancePatch,
            AttendanceStatus,
            AttendanceSummary,
            StudentAttendance,
            DateRange,
            Frequency,
            Term,
            TermDates,
            TermDateRange,
            SessionTerms,
            CurrentTermResponse,
            ResolveQuery,
        )
    ),
    tags(
        (name = "Attendance Wizard", description = "Multi-step creation of attendance sessions"),
        (name = "Calendar", description = "Academic sessions, terms and range presets"),
    ),
    info(
        title = "Rollbook API",
        version = "0.1.0",
        description = "Attendance session scheduling over a school's term calendar",
    )
)]
pub struct ApiDoc;
