//! Diesel table definitions, mirroring `migrations/`.

diesel::table! {
    users (id) {
        id -> Uuid,
        email -> Text,
        username -> Nullable<Text>,
        display_name -> Text,
        password_hash -> Text,
        status -> Text,
        roles -> Array<Text>,
        last_login_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    companies (id) {
        id -> Uuid,
        name -> Text,
        slug -> Text,
        description -> Nullable<Text>,
        owner_user_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    company_members (company_id, user_id) {
        company_id -> Uuid,
        user_id -> Uuid,
        role -> Text,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    profiles (id) {
        id -> Uuid,
        user_id -> Nullable<Uuid>,
        company_id -> Nullable<Uuid>,
        headline -> Nullable<Text>,
        about -> Nullable<Text>,
        location -> Nullable<Text>,
        website_url -> Nullable<Text>,
        visibility -> Text,
        avatar_media_id -> Nullable<Uuid>,
        banner_media_id -> Nullable<Uuid>,
        skill_ids -> Array<Uuid>,
        service_ids -> Array<Uuid>,
        niche_ids -> Array<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    profile_experiences (id) {
        id -> Uuid,
        profile_id -> Uuid,
        title -> Text,
        organisation -> Text,
        description -> Nullable<Text>,
        started_at -> Date,
        ended_at -> Nullable<Date>,
        sort_order -> Int4,
    }
}

diesel::table! {
    skills (id) {
        id -> Uuid,
        name -> Text,
    }
}

diesel::table! {
    services (id) {
        id -> Uuid,
        name -> Text,
    }
}

diesel::table! {
    industry_niches (id) {
        id -> Uuid,
        name -> Text,
    }
}

diesel::table! {
    posts (id) {
        id -> Uuid,
        author_user_id -> Nullable<Uuid>,
        author_company_id -> Nullable<Uuid>,
        group_id -> Nullable<Uuid>,
        kind -> Text,
        status -> Text,
        content_format -> Text,
        content -> Nullable<Text>,
        content_markdown -> Nullable<Text>,
        link_url -> Nullable<Text>,
        link_title -> Nullable<Text>,
        link_description -> Nullable<Text>,
        link_image_url -> Nullable<Text>,
        visibility -> Text,
        repost_of_post_id -> Nullable<Uuid>,
        moderation_status -> Text,
        scheduled_at -> Nullable<Timestamptz>,
        published_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    post_media (post_id, media_asset_id) {
        post_id -> Uuid,
        media_asset_id -> Uuid,
        sort_order -> Int4,
    }
}

diesel::table! {
    connections (id) {
        id -> Uuid,
        requester_id -> Uuid,
        recipient_id -> Uuid,
        status -> Text,
        created_at -> Timestamptz,
        responded_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    follows (id) {
        id -> Uuid,
        follower_id -> Uuid,
        followed_user_id -> Nullable<Uuid>,
        followed_company_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    message_threads (id) {
        id -> Uuid,
        thread_type -> Text,
        created_by_user_id -> Uuid,
        last_message_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    thread_participants (thread_id, user_id) {
        thread_id -> Uuid,
        user_id -> Uuid,
        last_read_message_id -> Nullable<Uuid>,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    messages (id) {
        id -> Uuid,
        thread_id -> Uuid,
        sender_user_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    groups (id) {
        id -> Uuid,
        name -> Text,
        slug -> Text,
        description -> Nullable<Text>,
        visibility -> Text,
        owner_user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    group_members (group_id, user_id) {
        group_id -> Uuid,
        user_id -> Uuid,
        role -> Text,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    reaction_types (id) {
        id -> Uuid,
        key -> Text,
        label -> Text,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    reactions (id) {
        id -> Uuid,
        user_id -> Uuid,
        reaction_type_id -> Uuid,
        target_post_id -> Nullable<Uuid>,
        target_comment_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Uuid,
        post_id -> Uuid,
        author_user_id -> Uuid,
        parent_comment_id -> Nullable<Uuid>,
        content -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    media_assets (id) {
        id -> Uuid,
        owner_user_id -> Uuid,
        media_type -> Text,
        bucket -> Text,
        storage_key -> Text,
        content_type -> Text,
        byte_size -> Nullable<Int8>,
        width -> Nullable<Int4>,
        height -> Nullable<Int4>,
        duration_seconds -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    analytics_events (id) {
        id -> Uuid,
        event_type -> Text,
        entity_type -> Text,
        entity_id -> Uuid,
        actor_user_id -> Nullable<Uuid>,
        metadata -> Jsonb,
        occurred_at -> Timestamptz,
    }
}

diesel::joinable!(company_members -> companies (company_id));
diesel::joinable!(company_members -> users (user_id));
diesel::joinable!(profile_experiences -> profiles (profile_id));
diesel::joinable!(post_media -> posts (post_id));
diesel::joinable!(post_media -> media_assets (media_asset_id));
diesel::joinable!(thread_participants -> message_threads (thread_id));
diesel::joinable!(messages -> message_threads (thread_id));
diesel::joinable!(group_members -> groups (group_id));
diesel::joinable!(reactions -> reaction_types (reaction_type_id));
diesel::joinable!(comments -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    companies,
    company_members,
    profiles,
    profile_experiences,
    skills,
    services,
    industry_niches,
    posts,
    post_media,
    connections,
    follows,
    message_threads,
    thread_participants,
    messages,
    groups,
    group_members,
    reaction_types,
    reactions,
    comments,
    media_assets,
    analytics_events,
);
