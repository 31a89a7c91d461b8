// Data models for the employee platform
// Rows map 1:1 onto the service tables; JSON uses camelCase field names

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::db::repository::Record;
use crate::validation::{
    date_of_birth_in_past, hire_date_not_in_future, salary_positive, start_date_in_past,
};

// ============================================================================
// Employee
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[validate(range(min = 0, message = "Employee ID must be positive or zero for new employees"))]
    pub employee_id: i64,

    #[validate(regex(path = "crate::validation::NOT_BLANK", message = "First name cannot be empty"))]
    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    pub first_name: String,

    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,

    #[validate(custom = "date_of_birth_in_past")]
    pub date_of_birth: NaiveDate,

    #[validate(regex(path = "crate::validation::GENDER", message = "Gender must be Male, Female, or Other"))]
    pub gender: String,

    #[validate(custom = "salary_positive")]
    pub salary: f64,

    #[validate(custom = "hire_date_not_in_future")]
    pub hire_date: NaiveDate,

    #[validate(regex(path = "crate::validation::NOT_BLANK", message = "Job stage cannot be empty"))]
    #[validate(length(max = 4, message = "Job stage must be at most 4 characters"))]
    pub job_stage: String,

    #[validate(regex(path = "crate::validation::NOT_BLANK", message = "Designation cannot be empty"))]
    #[validate(length(max = 100, message = "Designation must be at most 100 characters"))]
    pub designation: String,

    /// 0 means no manager
    #[serde(default)]
    #[validate(range(min = 0, message = "Manager Employee ID must be positive or zero (0 = no manager)"))]
    pub manager_employee_id: i64,
}

impl Record for Employee {
    type Id = i64;
    const LABEL: &'static str = "employee";
    const TITLE: &'static str = "Employee";
    const LIST_FIELD: &'static str = "empDetailsList";

    fn id(&self) -> i64 {
        self.employee_id
    }
}

/// Partial update for one employee; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    #[validate(range(min = 0, message = "Employee ID must be positive or zero"))]
    pub employee_id: i64,

    #[validate(regex(path = "crate::validation::NOT_BLANK", message = "First name cannot be empty"))]
    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,

    #[validate(custom = "date_of_birth_in_past")]
    pub date_of_birth: Option<NaiveDate>,

    #[validate(regex(path = "crate::validation::GENDER", message = "Gender must be Male, Female, or Other"))]
    pub gender: Option<String>,

    #[validate(custom = "salary_positive")]
    pub salary: Option<f64>,

    #[validate(custom = "hire_date_not_in_future")]
    pub hire_date: Option<NaiveDate>,

    #[validate(regex(path = "crate::validation::NOT_BLANK", message = "Job stage cannot be empty"))]
    #[validate(length(max = 4, message = "Job stage must be at most 4 characters"))]
    pub job_stage: Option<String>,

    #[validate(regex(path = "crate::validation::NOT_BLANK", message = "Designation cannot be empty"))]
    #[validate(length(max = 100, message = "Designation must be at most 100 characters"))]
    pub designation: Option<String>,

    #[validate(range(min = 0, message = "Manager Employee ID must be positive or zero (0 = no manager)"))]
    pub manager_employee_id: Option<i64>,
}

impl EmployeeUpdate {
    /// Copy every present field onto `employee`.
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(first_name) = self.first_name {
            employee.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            employee.last_name = Some(last_name);
        }
        if let Some(date_of_birth) = self.date_of_birth {
            employee.date_of_birth = date_of_birth;
        }
        if let Some(gender) = self.gender {
            employee.gender = gender;
        }
        if let Some(salary) = self.salary {
            employee.salary = salary;
        }
        if let Some(hire_date) = self.hire_date {
            employee.hire_date = hire_date;
        }
        if let Some(job_stage) = self.job_stage {
            employee.job_stage = job_stage;
        }
        if let Some(designation) = self.designation {
            employee.designation = designation;
        }
        if let Some(manager_employee_id) = self.manager_employee_id {
            employee.manager_employee_id = manager_employee_id;
        }
    }
}

// ============================================================================
// Department
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[validate(range(min = 0, message = "department ID must be positive or zero for new departments"))]
    pub department_id: i64,

    #[validate(regex(path = "crate::validation::NOT_BLANK", message = "Department name cannot be empty"))]
    #[validate(length(max = 100, message = "Department name must be at most 100 characters"))]
    pub department_name: String,

    #[serde(default)]
    pub locations: Vec<String>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Department head ID must be positive or zero"))]
    pub department_head_id: i64,

    #[serde(default)]
    pub department_employee_ids: Vec<i64>,
}

impl Record for Department {
    type Id = i64;
    const LABEL: &'static str = "department";
    const TITLE: &'static str = "Department";
    const LIST_FIELD: &'static str = "departmentDetailList";

    fn id(&self) -> i64 {
        self.department_id
    }
}

// ============================================================================
// Project
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[validate(range(min = 0, message = "Project ID must be positive or zero"))]
    pub project_id: i64,

    #[validate(regex(path = "crate::validation::NOT_BLANK", message = "Project name cannot be empty"))]
    #[validate(length(max = 50, message = "Project name must be at most 50 characters"))]
    pub project_name: String,

    #[validate(custom = "start_date_in_past")]
    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[validate(range(min = 1, message = "Department ID must be positive"))]
    pub department_id: i64,
}

impl Record for Project {
    type Id = i64;
    const LABEL: &'static str = "project";
    const TITLE: &'static str = "Project";
    const LIST_FIELD: &'static str = "prjDetailsList";

    fn id(&self) -> i64 {
        self.project_id
    }
}

// ============================================================================
// User profiles
// ============================================================================

/// Stored user; the bcrypt hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i64,
    pub user_name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub enabled: bool,
}

impl Record for UserProfile {
    type Id = i64;
    const LABEL: &'static str = "user";
    const TITLE: &'static str = "User";
    const LIST_FIELD: &'static str = "userProfileList";

    fn id(&self) -> i64 {
        self.user_id
    }
}

/// User as submitted by clients, with the plain-text password.
#[derive(Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileInput {
    #[validate(range(min = 0, message = "User ID must be positive or zero"))]
    pub user_id: i64,

    #[validate(regex(path = "crate::validation::NOT_BLANK", message = "User name cannot be empty"))]
    #[validate(length(max = 50, message = "User name must be at most 50 characters"))]
    pub user_name: String,

    #[serde(skip_serializing)]
    #[validate(length(min = 8, max = 16, message = "Password must be between 8 and 16 characters"))]
    pub password: String,

    #[validate(regex(path = "crate::validation::USER_ROLE", message = "Role must be admin or user"))]
    pub role: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl fmt::Debug for UserProfileInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserProfileInput")
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl UserProfileInput {
    pub fn into_profile(self, password_hash: String) -> UserProfile {
        UserProfile {
            user_id: self.user_id,
            user_name: self.user_name,
            password_hash,
            role: self.role,
            enabled: self.enabled,
        }
    }
}

// ============================================================================
// Employee yearly job details
// ============================================================================

/// Composite key of a yearly job details record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailsKey {
    pub employee_id: i64,
    pub year: i32,
}

impl fmt::Display for JobDetailsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.employee_id, self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeYearlyJobDetails {
    #[validate(range(min = 1, message = "Employee ID must be positive"))]
    pub employee_id: i64,

    #[validate(range(min = 1900, max = 2100, message = "Year must be between 1900 and 2100"))]
    pub year: i32,

    #[validate(range(min = 0.0, message = "Hike percentage must be positive or zero"))]
    pub hike_percentage: f64,

    #[validate(length(max = 500, message = "Employee remarks must be at most 500 characters"))]
    pub employee_remarks: Option<String>,

    #[validate(length(max = 500, message = "Manager remarks must be at most 500 characters"))]
    pub manager_remarks: Option<String>,

    #[validate(range(min = 1, message = "Department ID must be positive"))]
    pub department_id: i64,

    #[validate(range(min = 1, message = "Project ID must be positive"))]
    pub project_id: i64,
}

impl Record for EmployeeYearlyJobDetails {
    type Id = JobDetailsKey;
    const LABEL: &'static str = "employee yearly job details";
    const TITLE: &'static str = "Employee Yearly Job Details";
    const LIST_FIELD: &'static str = "employeeYrJobDetailsList";

    fn id(&self) -> JobDetailsKey {
        JobDetailsKey {
            employee_id: self.employee_id,
            year: self.year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use chrono::{Duration, Utc};

    pub(crate) fn sample_employee(id: i64) -> Employee {
        Employee {
            employee_id: id,
            first_name: "Sam".to_string(),
            last_name: Some("White".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender: "Male".to_string(),
            salary: 50000.0,
            hire_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            job_stage: "JS3".to_string(),
            designation: "Software Developer".to_string(),
            manager_employee_id: 0,
        }
    }

    #[test]
    fn test_valid_employee_passes() {
        assert!(sample_employee(1).validate().is_ok());
    }

    #[test]
    fn test_employee_violations_are_reported_per_field() {
        let mut employee = sample_employee(1);
        employee.first_name = "  ".to_string();
        employee.gender = "male".to_string();
        employee.salary = 0.0;
        employee.job_stage = "STAGE".to_string();
        employee.hire_date = Utc::now().date_naive() + Duration::days(3);

        let err = ValidationError::from(employee.validate().unwrap_err());
        assert_eq!(
            err.to_string(),
            "Validation failed: firstName: First name cannot be empty; \
             gender: Gender must be Male, Female, or Other; \
             hireDate: Hire date must be in the past or present; \
             jobStage: Job stage must be at most 4 characters; \
             salary: Salary must be positive; "
        );
    }

    #[test]
    fn test_employee_json_uses_camel_case_and_default_manager() {
        let json = r#"{
            "employeeId": 7, "firstName": "Ana", "dateOfBirth": "1991-05-02",
            "gender": "Female", "salary": 1200.5, "hireDate": "2020-02-01",
            "jobStage": "JS1", "designation": "Analyst"
        }"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.manager_employee_id, 0);
        assert_eq!(employee.last_name, None);

        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["dateOfBirth"], "1991-05-02");
        assert_eq!(value["employeeId"], 7);
    }

    #[test]
    fn test_employee_update_only_touches_present_fields() {
        let mut employee = sample_employee(3);
        let update = EmployeeUpdate {
            employee_id: 3,
            designation: Some("Lead".to_string()),
            salary: Some(90000.0),
            ..Default::default()
        };
        update.apply_to(&mut employee);

        assert_eq!(employee.designation, "Lead");
        assert_eq!(employee.salary, 90000.0);
        assert_eq!(employee.first_name, "Sam");
        assert_eq!(employee.job_stage, "JS3");
    }

    #[test]
    fn test_employee_update_validates_present_fields_only() {
        let update = EmployeeUpdate {
            employee_id: 3,
            gender: Some("unknown".to_string()),
            ..Default::default()
        };
        let err = ValidationError::from(update.validate().unwrap_err());
        assert!(err.to_string().contains("gender: Gender must be Male, Female, or Other"));

        let empty = EmployeeUpdate {
            employee_id: 3,
            ..Default::default()
        };
        assert!(empty.validate().is_ok());
    }

    #[test]
    fn test_user_profile_hides_password_hash() {
        let profile = UserProfile {
            user_id: 1,
            user_name: "alice".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            role: "admin".to_string(),
            enabled: true,
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["userName"], "alice");
    }

    #[test]
    fn test_user_input_rules() {
        let input: UserProfileInput = serde_json::from_str(
            r#"{"userId": 1, "userName": "bob", "password": "short", "role": "root"}"#,
        )
        .unwrap();
        assert!(input.enabled);
        assert!(!format!("{:?}", input).contains("short"));

        let err = ValidationError::from(input.validate().unwrap_err());
        assert_eq!(
            err.to_string(),
            "Validation failed: password: Password must be between 8 and 16 characters; \
             role: Role must be admin or user; "
        );
    }

    #[test]
    fn test_project_start_date_must_be_past() {
        let project = Project {
            project_id: 1,
            project_name: "Apollo".to_string(),
            start_date: Utc::now().date_naive(),
            end_date: Utc::now().date_naive() + Duration::days(30),
            department_id: 0,
        };
        let err = ValidationError::from(project.validate().unwrap_err());
        assert_eq!(
            err.to_string(),
            "Validation failed: departmentId: Department ID must be positive; \
             startDate: Start Date must be in the past; "
        );
    }

    #[test]
    fn test_job_details_key_display() {
        let details = EmployeeYearlyJobDetails {
            employee_id: 12,
            year: 2023,
            hike_percentage: 7.5,
            employee_remarks: None,
            manager_remarks: Some("Solid year".to_string()),
            department_id: 2,
            project_id: 4,
        };
        assert_eq!(details.id().to_string(), "12/2023");
        assert!(details.validate().is_ok());
    }
}
