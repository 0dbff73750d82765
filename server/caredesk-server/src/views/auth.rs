use super::layout;
use crate::flash::Flash;
use crate::routes::paths;

pub fn login_page(flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<section>
            <h1>Log in</h1>
            <form method="post" action="{login}">
                <label>Username <input type="text" name="username" required autofocus></label>
                <label>Password <input type="password" name="password" required></label>
                <label><input type="checkbox" name="remember"> Remember me</label>
                <p><button type="submit">Log in</button></p>
            </form>
            <p>No account yet? <a href="{signup}">Sign up</a></p>
        </section>"#,
        login = paths::LOGIN,
        signup = paths::SIGNUP,
    );
    layout("Log in", None, flash, &body)
}

pub fn signup_page(flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<section>
            <h1>Sign up</h1>
            <form method="post" action="{signup}">
                <label>Username <input type="text" name="username" required autofocus></label>
                <label>Password <input type="password" name="password" required></label>
                <label>Confirm password <input type="password" name="confirm_password" required></label>
                <label>Role
                    <select name="role">
                        <option value="">Select a role</option>
                        <option value="doctor">Doctor</option>
                        <option value="patient">Patient</option>
                    </select>
                </label>
                <p><button type="submit">Create account</button></p>
            </form>
            <p>Already registered? <a href="{login}">Log in</a></p>
        </section>"#,
        signup = paths::SIGNUP,
        login = paths::LOGIN,
    );
    layout("Sign up", None, flash, &body)
}
