pub fn render_ticket_assigned(name: &str, ticket_title: &str, base_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Ticket assigned to you</h2>
    <p>Hi {name},</p>
    <p>The support ticket <strong>{ticket_title}</strong> has been assigned to you.</p>
    <p><a href="{base_url}/support/tickets" style="display: inline-block; padding: 10px 20px; background: #0070f3; color: white; text-decoration: none; border-radius: 4px;">Open Tickets</a></p>
</body>
</html>"#
    )
}

pub fn render_equipment_assigned(name: &str, equipment_summary: &str, base_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Equipment assigned to you</h2>
    <p>Hi {name},</p>
    <p>You are now the assignee of <strong>{equipment_summary}</strong>.</p>
    <p><a href="{base_url}/equipment" style="display: inline-block; padding: 10px 20px; background: #0070f3; color: white; text-decoration: none; border-radius: 4px;">View Inventory</a></p>
</body>
</html>"#
    )
}

pub fn render_backup_result(archive_name: &str, success: bool) -> String {
    let (heading, body) = if success {
        ("Backup completed", "The backup archive was created successfully.")
    } else {
        ("Backup failed", "The backup run did not complete. Check the server logs.")
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>{heading}</h2>
    <p>{body}</p>
    <p style="color: #666; font-size: 14px;">Archive: {archive_name}</p>
</body>
</html>"#
    )
}
