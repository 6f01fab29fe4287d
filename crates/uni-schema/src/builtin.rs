//! Built-in canonical schemas and provider key tables.
//!
//! Adding a provider or object type is a data change here; nothing in the
//! transform code branches on a provider tag.

use uni_core::{ObjectType, ProviderId};

use crate::field::{ObjectSchema, StandardField, TimestampFormat, WriteEnvelope};

const PRIORITIES: &[&str] = &["high", "medium", "low"];

fn audit_fields() -> [StandardField; 4] {
    [
        StandardField::string("id").read_only(),
        StandardField::string("remoteId").read_only(),
        StandardField::timestamp("createdTimestamp").read_only(),
        StandardField::timestamp("updatedTimestamp").read_only(),
    ]
}

fn with_audit(object_type: ObjectType, fields: &[StandardField], associations: &[&'static str]) -> ObjectSchema {
    let [id, remote_id, created, updated] = audit_fields();
    let mut all = vec![id, remote_id];
    all.extend_from_slice(fields);
    all.extend([created, updated]);
    ObjectSchema {
        object_type,
        fields: all,
        associations: associations.to_vec(),
    }
}

/// Canonical schemas for every built-in object type.
#[must_use]
pub fn object_schemas() -> Vec<ObjectSchema> {
    vec![
        with_audit(
            ObjectType::Contact,
            &[
                StandardField::string("firstName"),
                StandardField::string("lastName"),
                StandardField::string("phone"),
                StandardField::string("email"),
            ],
            &["company", "deal", "note", "task", "event"],
        ),
        with_audit(
            ObjectType::Company,
            &[
                StandardField::string("name").required(),
                StandardField::string("industry"),
                StandardField::string("description"),
                StandardField::number("annualRevenue"),
                StandardField::number("size"),
                StandardField::string("phone"),
                StandardField::object("address"),
            ],
            &["contact", "deal", "note", "task", "event"],
        ),
        with_audit(
            ObjectType::Deal,
            &[
                StandardField::string("name").required(),
                StandardField::number("amount"),
                StandardField::enumeration("priority", PRIORITIES),
                StandardField::string("stage"),
                StandardField::number("probability"),
                StandardField::timestamp("expectedCloseDate"),
                StandardField::boolean("isWon"),
            ],
            &["contact", "company", "note", "task", "event"],
        ),
        with_audit(
            ObjectType::Lead,
            &[
                StandardField::string("firstName"),
                StandardField::string("lastName"),
                StandardField::string("email"),
                StandardField::string("phone"),
            ],
            &["contact", "company", "deal"],
        ),
        with_audit(
            ObjectType::Note,
            &[StandardField::string("content").required()],
            &["contact", "company", "deal"],
        ),
        with_audit(
            ObjectType::Task,
            &[
                StandardField::string("subject").required(),
                StandardField::string("body"),
                StandardField::enumeration("priority", PRIORITIES),
                StandardField::string("status"),
                StandardField::timestamp("dueDate"),
            ],
            &["contact", "company", "deal"],
        ),
        with_audit(
            ObjectType::Event,
            &[
                StandardField::string("subject").required(),
                StandardField::timestamp("startDateTime"),
                StandardField::timestamp("endDateTime"),
                StandardField::boolean("isAllDayEvent"),
                StandardField::string("location"),
            ],
            &["contact", "company", "deal"],
        ),
        ObjectSchema {
            object_type: ObjectType::Message,
            fields: vec![
                StandardField::string("id").read_only(),
                StandardField::string("text").required(),
                StandardField::string("channelId").required(),
                StandardField::timestamp("createdTimestamp").read_only(),
            ],
            associations: Vec::new(),
        },
    ]
}

/// Write envelope and timestamp representation per provider.
pub const PROVIDER_PROFILES: &[(ProviderId, WriteEnvelope, TimestampFormat)] = &[
    (ProviderId::Hubspot, WriteEnvelope::Properties, TimestampFormat::EpochMillis),
    (ProviderId::Zohocrm, WriteEnvelope::DataArray, TimestampFormat::Rfc3339),
    (ProviderId::Sfdc, WriteEnvelope::Flat, TimestampFormat::Rfc3339),
    (ProviderId::Pipedrive, WriteEnvelope::Flat, TimestampFormat::Rfc3339),
    (ProviderId::Closecrm, WriteEnvelope::Flat, TimestampFormat::Rfc3339),
    (ProviderId::MsDynamics365Sales, WriteEnvelope::Flat, TimestampFormat::Rfc3339),
    (ProviderId::Slack, WriteEnvelope::Flat, TimestampFormat::EpochSeconds),
    (ProviderId::Discord, WriteEnvelope::Flat, TimestampFormat::Rfc3339),
];

type KeyTable = &'static [(&'static str, &'static str)];

/// Default provider key per canonical field, per (provider, object type).
pub const KEY_TABLES: &[(ProviderId, ObjectType, KeyTable)] = &[
    // --- HubSpot (values arrive under `properties`) ---
    (ProviderId::Hubspot, ObjectType::Contact, &[
        ("id", "hs_object_id"),
        ("remoteId", "id"),
        ("firstName", "firstname"),
        ("lastName", "lastname"),
        ("phone", "phone"),
        ("email", "email"),
        ("createdTimestamp", "createdate"),
        ("updatedTimestamp", "lastmodifieddate"),
    ]),
    (ProviderId::Hubspot, ObjectType::Company, &[
        ("id", "hs_object_id"),
        ("remoteId", "id"),
        ("name", "name"),
        ("industry", "industry"),
        ("description", "description"),
        ("annualRevenue", "annualrevenue"),
        ("size", "numberofemployees"),
        ("phone", "phone"),
        ("createdTimestamp", "createdate"),
        ("updatedTimestamp", "hs_lastmodifieddate"),
    ]),
    (ProviderId::Hubspot, ObjectType::Deal, &[
        ("id", "hs_object_id"),
        ("remoteId", "id"),
        ("name", "dealname"),
        ("amount", "amount"),
        ("priority", "hs_priority"),
        ("stage", "dealstage"),
        ("probability", "hs_deal_stage_probability"),
        ("expectedCloseDate", "closedate"),
        ("isWon", "hs_is_closed_won"),
        ("createdTimestamp", "createdate"),
        ("updatedTimestamp", "hs_lastmodifieddate"),
    ]),
    (ProviderId::Hubspot, ObjectType::Note, &[
        ("id", "hs_object_id"),
        ("remoteId", "id"),
        ("content", "hs_note_body"),
        ("createdTimestamp", "hs_createdate"),
        ("updatedTimestamp", "hs_lastmodifieddate"),
    ]),
    (ProviderId::Hubspot, ObjectType::Task, &[
        ("id", "hs_object_id"),
        ("remoteId", "id"),
        ("subject", "hs_task_subject"),
        ("body", "hs_task_body"),
        ("priority", "hs_task_priority"),
        ("status", "hs_task_status"),
        ("dueDate", "hs_timestamp"),
        ("createdTimestamp", "hs_createdate"),
        ("updatedTimestamp", "hs_lastmodifieddate"),
    ]),
    (ProviderId::Hubspot, ObjectType::Event, &[
        ("id", "hs_object_id"),
        ("remoteId", "id"),
        ("subject", "hs_meeting_title"),
        ("startDateTime", "hs_meeting_start_time"),
        ("endDateTime", "hs_meeting_end_time"),
        ("location", "hs_meeting_location"),
        ("createdTimestamp", "hs_createdate"),
        ("updatedTimestamp", "hs_lastmodifieddate"),
    ]),
    // --- Zoho CRM ---
    (ProviderId::Zohocrm, ObjectType::Contact, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("firstName", "First_Name"),
        ("lastName", "Last_Name"),
        ("phone", "Phone"),
        ("email", "Email"),
        ("createdTimestamp", "Created_Time"),
        ("updatedTimestamp", "Modified_Time"),
    ]),
    (ProviderId::Zohocrm, ObjectType::Company, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("name", "Account_Name"),
        ("industry", "Industry"),
        ("description", "Description"),
        ("annualRevenue", "Annual_Revenue"),
        ("size", "Employees"),
        ("phone", "Phone"),
        ("createdTimestamp", "Created_Time"),
        ("updatedTimestamp", "Modified_Time"),
    ]),
    (ProviderId::Zohocrm, ObjectType::Deal, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("name", "Deal_Name"),
        ("amount", "Amount"),
        ("stage", "Stage"),
        ("probability", "Probability"),
        ("expectedCloseDate", "Closing_Date"),
        ("createdTimestamp", "Created_Time"),
        ("updatedTimestamp", "Modified_Time"),
    ]),
    (ProviderId::Zohocrm, ObjectType::Lead, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("firstName", "First_Name"),
        ("lastName", "Last_Name"),
        ("email", "Email"),
        ("phone", "Phone"),
        ("createdTimestamp", "Created_Time"),
        ("updatedTimestamp", "Modified_Time"),
    ]),
    (ProviderId::Zohocrm, ObjectType::Note, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("content", "Note_Content"),
        ("createdTimestamp", "Created_Time"),
        ("updatedTimestamp", "Modified_Time"),
    ]),
    (ProviderId::Zohocrm, ObjectType::Task, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("subject", "Subject"),
        ("body", "Description"),
        ("priority", "Priority"),
        ("status", "Status"),
        ("dueDate", "Due_Date"),
        ("createdTimestamp", "Created_Time"),
        ("updatedTimestamp", "Modified_Time"),
    ]),
    (ProviderId::Zohocrm, ObjectType::Event, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("subject", "Event_Title"),
        ("startDateTime", "Start_DateTime"),
        ("endDateTime", "End_DateTime"),
        ("isAllDayEvent", "All_day"),
        ("location", "Venue"),
        ("createdTimestamp", "Created_Time"),
        ("updatedTimestamp", "Modified_Time"),
    ]),
    // --- Salesforce ---
    (ProviderId::Sfdc, ObjectType::Contact, &[
        ("id", "Id"),
        ("remoteId", "Id"),
        ("firstName", "FirstName"),
        ("lastName", "LastName"),
        ("phone", "Phone"),
        ("email", "Email"),
        ("createdTimestamp", "CreatedDate"),
        ("updatedTimestamp", "LastModifiedDate"),
    ]),
    (ProviderId::Sfdc, ObjectType::Company, &[
        ("id", "Id"),
        ("remoteId", "Id"),
        ("name", "Name"),
        ("industry", "Industry"),
        ("description", "Description"),
        ("annualRevenue", "AnnualRevenue"),
        ("size", "NumberOfEmployees"),
        ("phone", "Phone"),
        ("address", "BillingAddress"),
        ("createdTimestamp", "CreatedDate"),
        ("updatedTimestamp", "LastModifiedDate"),
    ]),
    (ProviderId::Sfdc, ObjectType::Deal, &[
        ("id", "Id"),
        ("remoteId", "Id"),
        ("name", "Name"),
        ("amount", "Amount"),
        ("stage", "StageName"),
        ("probability", "Probability"),
        ("expectedCloseDate", "CloseDate"),
        ("isWon", "IsWon"),
        ("createdTimestamp", "CreatedDate"),
        ("updatedTimestamp", "LastModifiedDate"),
    ]),
    (ProviderId::Sfdc, ObjectType::Lead, &[
        ("id", "Id"),
        ("remoteId", "Id"),
        ("firstName", "FirstName"),
        ("lastName", "LastName"),
        ("email", "Email"),
        ("phone", "Phone"),
        ("createdTimestamp", "CreatedDate"),
        ("updatedTimestamp", "LastModifiedDate"),
    ]),
    (ProviderId::Sfdc, ObjectType::Note, &[
        ("id", "Id"),
        ("remoteId", "Id"),
        ("content", "Body"),
        ("createdTimestamp", "CreatedDate"),
        ("updatedTimestamp", "LastModifiedDate"),
    ]),
    (ProviderId::Sfdc, ObjectType::Task, &[
        ("id", "Id"),
        ("remoteId", "Id"),
        ("subject", "Subject"),
        ("body", "Description"),
        ("priority", "Priority"),
        ("status", "Status"),
        ("dueDate", "ActivityDate"),
        ("createdTimestamp", "CreatedDate"),
        ("updatedTimestamp", "LastModifiedDate"),
    ]),
    (ProviderId::Sfdc, ObjectType::Event, &[
        ("id", "Id"),
        ("remoteId", "Id"),
        ("subject", "Subject"),
        ("startDateTime", "StartDateTime"),
        ("endDateTime", "EndDateTime"),
        ("isAllDayEvent", "IsAllDayEvent"),
        ("location", "Location"),
        ("createdTimestamp", "CreatedDate"),
        ("updatedTimestamp", "LastModifiedDate"),
    ]),
    // --- Pipedrive (custom values keyed by hash IDs; resolve first) ---
    (ProviderId::Pipedrive, ObjectType::Contact, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("phone", "phone.0.value"),
        ("email", "email.0.value"),
        ("createdTimestamp", "add_time"),
        ("updatedTimestamp", "update_time"),
    ]),
    (ProviderId::Pipedrive, ObjectType::Company, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("name", "name"),
        ("size", "people_count"),
        ("createdTimestamp", "add_time"),
        ("updatedTimestamp", "update_time"),
    ]),
    (ProviderId::Pipedrive, ObjectType::Deal, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("name", "title"),
        ("amount", "value"),
        ("stage", "stage_id"),
        ("probability", "probability"),
        ("expectedCloseDate", "expected_close_date"),
        ("createdTimestamp", "add_time"),
        ("updatedTimestamp", "update_time"),
    ]),
    (ProviderId::Pipedrive, ObjectType::Note, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("content", "content"),
        ("createdTimestamp", "add_time"),
        ("updatedTimestamp", "update_time"),
    ]),
    (ProviderId::Pipedrive, ObjectType::Task, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("subject", "subject"),
        ("body", "note"),
        ("dueDate", "due_date"),
        ("createdTimestamp", "add_time"),
        ("updatedTimestamp", "update_time"),
    ]),
    // --- Close ---
    (ProviderId::Closecrm, ObjectType::Contact, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("firstName", "name"),
        ("phone", "phones.0.phone"),
        ("email", "emails.0.email"),
        ("createdTimestamp", "date_created"),
        ("updatedTimestamp", "date_updated"),
    ]),
    (ProviderId::Closecrm, ObjectType::Company, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("name", "name"),
        ("description", "description"),
        ("createdTimestamp", "date_created"),
        ("updatedTimestamp", "date_updated"),
    ]),
    (ProviderId::Closecrm, ObjectType::Deal, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("name", "note"),
        ("amount", "value"),
        ("stage", "status_label"),
        ("probability", "confidence"),
        ("createdTimestamp", "date_created"),
        ("updatedTimestamp", "date_updated"),
    ]),
    (ProviderId::Closecrm, ObjectType::Note, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("content", "note"),
        ("createdTimestamp", "date_created"),
        ("updatedTimestamp", "date_updated"),
    ]),
    (ProviderId::Closecrm, ObjectType::Task, &[
        ("id", "id"),
        ("remoteId", "id"),
        ("subject", "text"),
        ("dueDate", "date"),
        ("createdTimestamp", "date_created"),
        ("updatedTimestamp", "date_updated"),
    ]),
    // --- Microsoft Dynamics 365 Sales ---
    (ProviderId::MsDynamics365Sales, ObjectType::Contact, &[
        ("id", "contactid"),
        ("remoteId", "contactid"),
        ("firstName", "firstname"),
        ("lastName", "lastname"),
        ("phone", "telephone1"),
        ("email", "emailaddress1"),
        ("createdTimestamp", "createdon"),
        ("updatedTimestamp", "modifiedon"),
    ]),
    (ProviderId::MsDynamics365Sales, ObjectType::Company, &[
        ("id", "accountid"),
        ("remoteId", "accountid"),
        ("name", "name"),
        ("description", "description"),
        ("annualRevenue", "revenue"),
        ("size", "numberofemployees"),
        ("phone", "telephone1"),
        ("createdTimestamp", "createdon"),
        ("updatedTimestamp", "modifiedon"),
    ]),
    (ProviderId::MsDynamics365Sales, ObjectType::Deal, &[
        ("id", "opportunityid"),
        ("remoteId", "opportunityid"),
        ("name", "name"),
        ("amount", "estimatedvalue"),
        ("probability", "closeprobability"),
        ("expectedCloseDate", "estimatedclosedate"),
        ("createdTimestamp", "createdon"),
        ("updatedTimestamp", "modifiedon"),
    ]),
    (ProviderId::MsDynamics365Sales, ObjectType::Lead, &[
        ("id", "leadid"),
        ("remoteId", "leadid"),
        ("firstName", "firstname"),
        ("lastName", "lastname"),
        ("email", "emailaddress1"),
        ("phone", "telephone1"),
        ("createdTimestamp", "createdon"),
        ("updatedTimestamp", "modifiedon"),
    ]),
    (ProviderId::MsDynamics365Sales, ObjectType::Note, &[
        ("id", "annotationid"),
        ("remoteId", "annotationid"),
        ("content", "notetext"),
        ("createdTimestamp", "createdon"),
        ("updatedTimestamp", "modifiedon"),
    ]),
    (ProviderId::MsDynamics365Sales, ObjectType::Task, &[
        ("id", "activityid"),
        ("remoteId", "activityid"),
        ("subject", "subject"),
        ("body", "description"),
        ("dueDate", "scheduledend"),
        ("createdTimestamp", "createdon"),
        ("updatedTimestamp", "modifiedon"),
    ]),
    (ProviderId::MsDynamics365Sales, ObjectType::Event, &[
        ("id", "activityid"),
        ("remoteId", "activityid"),
        ("subject", "subject"),
        ("startDateTime", "scheduledstart"),
        ("endDateTime", "scheduledend"),
        ("isAllDayEvent", "isalldayevent"),
        ("location", "location"),
        ("createdTimestamp", "createdon"),
        ("updatedTimestamp", "modifiedon"),
    ]),
    // --- Chat ---
    (ProviderId::Slack, ObjectType::Message, &[
        ("id", "ts"),
        ("text", "text"),
        ("channelId", "channel"),
        ("createdTimestamp", "ts"),
    ]),
    (ProviderId::Discord, ObjectType::Message, &[
        ("id", "id"),
        ("text", "content"),
        ("channelId", "channel_id"),
        ("createdTimestamp", "timestamp"),
    ]),
];
