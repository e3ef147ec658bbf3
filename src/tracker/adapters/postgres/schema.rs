//! Diesel schema for tracker tables.

diesel::table! {
    /// Projects owning sprints, statuses and tasks.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 200]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Creating user.
        author_id -> Nullable<Uuid>,
        /// User who last edited the project.
        last_editor_id -> Nullable<Uuid>,
        /// Deadline.
        finish_by -> Nullable<Timestamptz>,
        /// Completion timestamp, set while the project is complete.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sprints within a project.
    sprints (id) {
        /// Sprint identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Display name.
        #[max_length = 200]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Creating user.
        author_id -> Nullable<Uuid>,
        /// User who last edited the sprint.
        last_editor_id -> Nullable<Uuid>,
        /// Deadline.
        finish_by -> Nullable<Timestamptz>,
        /// Completion timestamp, set while the sprint is complete.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Workflow statuses, ordered per project by rank.
    statuses (id) {
        /// Status identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Display name.
        #[max_length = 200]
        name -> Varchar,
        /// Position in the project's workflow, unique per project.
        rank -> Int4,
        /// Creating user.
        author_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks within a project.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Sprint the task is planned into.
        sprint_id -> Nullable<Uuid>,
        /// Current workflow status.
        status_id -> Nullable<Uuid>,
        /// Display name.
        #[max_length = 200]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Creating user.
        author_id -> Nullable<Uuid>,
        /// Assigned worker.
        worker_id -> Nullable<Uuid>,
        /// User who last edited the task.
        last_editor_id -> Nullable<Uuid>,
        /// Deadline.
        finish_by -> Nullable<Timestamptz>,
        /// Completion timestamp, set while the task is complete.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(sprints -> projects (project_id));
diesel::joinable!(statuses -> projects (project_id));
diesel::joinable!(tasks -> projects (project_id));

diesel::allow_tables_to_appear_in_same_query!(projects, sprints, statuses, tasks);
