//! Post-payment enrollment provisioning.
//!
//! Turns a CONFIRMED purchase into an active enrollment: resolve the plan
//! and academic period, upsert the enrollment, materialize the selected
//! weekly slots as UTC schedules and dated bookings, and promote the buyer
//! to student. Soft outcomes (no slots yet, no open period, plan without
//! classes) leave the purchase CONFIRMED and never fail the request.

use std::collections::HashMap;

use chrono::Utc;
use chrono_tz::Tz;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use domain::models::{Plan, User, WeeklySlot};
use domain::services::{booking_dates, convert_slot_to_utc, format_day};
use persistence::entities::PurchaseEntity;
use persistence::repositories::{
    AcademicPeriodRepository, ClassBookingInput, ClassBookingRepository, ClassScheduleInput,
    ClassScheduleRepository, CourseRepository, EnrollmentRepository, EnrollmentUpsertInput,
    UserRepository,
};

use crate::config::SchedulingConfig;
use crate::error::ApiError;
use crate::middleware::metrics::{record_bookings_generated, record_enrollment_provisioned};

/// What provisioning did with one purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Purchase is now ENROLLED with schedules and bookings in place.
    Enrolled {
        enrollment_id: Uuid,
        course_title: String,
    },
    /// Class-inclusive purchase without a weekly schedule yet; the buyer
    /// picks slots later via the schedule endpoint.
    AwaitingSchedule,
    /// No academic period is open or upcoming; purchase stays CONFIRMED.
    NoPeriod,
    /// Plan does not drive enrollment (no plan, not class-inclusive, or
    /// missing course).
    NotEligible,
}

/// Provisions purchases into enrollments.
#[derive(Clone)]
pub struct ProvisioningService {
    pool: PgPool,
    scheduling: SchedulingConfig,
}

impl ProvisioningService {
    pub fn new(pool: PgPool, scheduling: SchedulingConfig) -> Self {
        Self { pool, scheduling }
    }

    /// Provision a single purchase for a student.
    ///
    /// Hard database failures bubble up; everything the buyer can resolve
    /// themselves comes back as a soft outcome.
    pub async fn provision_purchase(
        &self,
        student: &User,
        purchase: &PurchaseEntity,
    ) -> Result<ProvisionOutcome, ApiError> {
        let Some(plan_id) = purchase.plan_id else {
            return Ok(ProvisionOutcome::NotEligible);
        };

        let course_repo = CourseRepository::new(self.pool.clone());
        let Some(plan_entity) = course_repo.find_plan_by_id(plan_id).await? else {
            warn!(
                purchase_id = %purchase.id,
                plan_id = %plan_id,
                "Purchase references unknown plan"
            );
            return Ok(ProvisionOutcome::NotEligible);
        };
        let plan = Plan::from(plan_entity);

        if !plan.is_enrollable() {
            return Ok(ProvisionOutcome::NotEligible);
        }
        let Some(course_id) = plan.course_id else {
            return Ok(ProvisionOutcome::NotEligible);
        };

        let period_repo = AcademicPeriodRepository::new(self.pool.clone());
        let today = Utc::now().date_naive();
        let Some(period) = period_repo.resolve_current(today).await? else {
            info!(
                purchase_id = %purchase.id,
                "No open or upcoming academic period; purchase stays CONFIRMED"
            );
            return Ok(ProvisionOutcome::NoPeriod);
        };

        let Some(slots) = slots_from_snapshot(purchase.selected_schedule.as_ref()) else {
            return Ok(ProvisionOutcome::AwaitingSchedule);
        };

        let classes_total = classes_total(
            purchase.prorated_classes,
            plan.classes_per_period,
            self.scheduling.default_classes_per_period,
        );

        let enrollment_repo = EnrollmentRepository::new(self.pool.clone());
        let enrollment = enrollment_repo
            .upsert_for_purchase(EnrollmentUpsertInput {
                student_id: student.id,
                course_id,
                academic_period_id: period.id,
                teacher_id: slots.first().map(|s| s.teacher_id),
                classes_total,
                purchase_id: purchase.id,
            })
            .await?;

        let schedule_repo = ClassScheduleRepository::new(self.pool.clone());
        let booking_repo = ClassBookingRepository::new(self.pool.clone());
        let mut zones: HashMap<Uuid, Tz> = HashMap::new();
        let mut bookings_created = 0usize;

        for slot in &slots {
            let tz = self.teacher_zone(&mut zones, slot.teacher_id).await?;
            let utc_slot = convert_slot_to_utc(slot, tz).map_err(|e| {
                ApiError::Internal(format!(
                    "Stored schedule snapshot failed conversion: {}",
                    e
                ))
            })?;

            schedule_repo
                .create_if_absent(&ClassScheduleInput {
                    enrollment_id: enrollment.id,
                    teacher_id: slot.teacher_id,
                    day_of_week: utc_slot.day_of_week,
                    start_time: utc_slot.start_time.clone(),
                    end_time: utc_slot.end_time.clone(),
                })
                .await?;

            let time_slot = utc_slot.time_slot();
            for date in booking_dates(
                period.start_date,
                period.end_date,
                today,
                utc_slot.day_of_week,
            ) {
                let (_, was_created) = booking_repo
                    .create_if_absent(&ClassBookingInput {
                        student_id: student.id,
                        teacher_id: slot.teacher_id,
                        enrollment_id: enrollment.id,
                        day: format_day(date),
                        time_slot: time_slot.clone(),
                    })
                    .await?;
                if was_created {
                    bookings_created += 1;
                }
            }
        }

        let user_repo = UserRepository::new(self.pool.clone());
        let promoted = user_repo.promote_to_student(student.id).await?;
        if promoted {
            info!(user_id = %student.id, "Promoted buyer to STUDENT");
        }

        let course_title = course_repo
            .find_by_id(course_id)
            .await?
            .map(|c| c.title)
            .unwrap_or_else(|| plan.name.clone());

        record_bookings_generated(bookings_created);
        record_enrollment_provisioned();
        info!(
            purchase_id = %purchase.id,
            enrollment_id = %enrollment.id,
            slots = slots.len(),
            bookings_created,
            "Provisioned purchase into enrollment"
        );

        Ok(ProvisionOutcome::Enrolled {
            enrollment_id: enrollment.id,
            course_title,
        })
    }

    /// Resolve the time zone the slot's teacher works in.
    ///
    /// Slots are converted in the instructing teacher's zone; an account
    /// without a usable zone falls back to the configured default.
    async fn teacher_zone(
        &self,
        cache: &mut HashMap<Uuid, Tz>,
        teacher_id: Uuid,
    ) -> Result<Tz, ApiError> {
        if let Some(tz) = cache.get(&teacher_id) {
            return Ok(*tz);
        }

        let user_repo = UserRepository::new(self.pool.clone());
        let stored = user_repo
            .find_by_id(teacher_id)
            .await?
            .and_then(|u| u.timezone);

        let tz = match stored.as_deref().map(str::parse::<Tz>) {
            Some(Ok(tz)) => tz,
            Some(Err(_)) => {
                warn!(
                    teacher_id = %teacher_id,
                    zone = ?stored,
                    "Teacher has unparseable time zone; using default"
                );
                self.default_zone()
            }
            None => self.default_zone(),
        };

        cache.insert(teacher_id, tz);
        Ok(tz)
    }

    fn default_zone(&self) -> Tz {
        self.scheduling
            .default_timezone
            .parse()
            .unwrap_or(chrono_tz::America::Lima)
    }
}

/// Deserialize the stored weekly slots. Missing, empty, or corrupt
/// snapshots count as "not selected yet".
fn slots_from_snapshot(snapshot: Option<&serde_json::Value>) -> Option<Vec<WeeklySlot>> {
    let value = snapshot?;
    match serde_json::from_value::<Vec<WeeklySlot>>(value.clone()) {
        Ok(slots) if !slots.is_empty() => Some(slots),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "Ignoring corrupt schedule snapshot");
            None
        }
    }
}

/// Classes granted for the period: explicit proration wins, then the
/// plan's nominal count, then the configured default.
fn classes_total(prorated: Option<i32>, plan_classes: i32, default_classes: i32) -> i32 {
    match prorated {
        Some(n) if n > 0 => n,
        _ if plan_classes > 0 => plan_classes,
        _ => default_classes,
    }
}
