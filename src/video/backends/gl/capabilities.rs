use std::cmp;
use std::ffi;
use std::os::raw::c_void;

use gl::types::*;

use crate::errors::*;

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version::GL(3, 0) >= Version::ES(3, 0)` and `Version::ES(3, 0) >=
/// Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        let (es1, major1, minor1) = match *self {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        let (es2, major2, minor2) = match *other {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        if es1 != es2 {
            None
        } else {
            match major1.cmp(&major2) {
                cmp::Ordering::Equal => Some(minor1.cmp(&minor2)),
                v => Some(v),
            }
        }
    }
}

impl Version {
    /// Parses a `GL_VERSION` string, e.g. `4.6.0 NVIDIA 535.54` or `OpenGL ES 3.2 Mesa`.
    pub fn parse(desc: &str) -> Result<Version> {
        // ES strings carry a profile before the number, e.g. `OpenGL ES-CM 1.1`.
        let (es, desc) = if desc.starts_with("OpenGL ES") {
            let profile = &desc["OpenGL ES".len()..];
            match profile.find(' ') {
                Some(i) => (true, profile[i..].trim_start()),
                None => (true, ""),
            }
        } else {
            (false, desc)
        };

        let desc = desc
            .split(' ')
            .next()
            .ok_or_else(|| format_err!("[GL] Version string {:?} is unformaled.", desc))?;

        let mut iter = desc.split('.').map(|v| v.parse::<u8>());
        match (iter.next(), iter.next()) {
            (Some(Ok(major)), Some(Ok(minor))) => {
                if es {
                    Ok(Version::ES(major, minor))
                } else {
                    Ok(Version::GL(major, minor))
                }
            }
            _ => bail!("[GL] Version string {:?} is unformaled.", desc),
        }
    }
}

macro_rules! entry_points {
    ($($name:ident,)+) => {
        /// Names of the GL entry points the shader context calls.
        pub const REQUIRED_ENTRY_POINTS: &[&str] = &[
            $(
                concat!("gl", stringify!($name)),
            )+
        ];

        /// Returns the names of the required entry points that failed to load.
        fn missing_entry_points() -> Vec<&'static str> {
            let mut missing = Vec::new();
            $(
                if !gl::$name::is_loaded() {
                    missing.push(concat!("gl", stringify!($name)));
                }
            )+
            missing
        }
    }
}

entry_points! {
    CreateShader,
    ShaderSource,
    CompileShader,
    GetShaderiv,
    GetShaderInfoLog,
    DeleteShader,
    AttachShader,
    DetachShader,
    CreateProgram,
    DeleteProgram,
    BindAttribLocation,
    LinkProgram,
    ValidateProgram,
    GetProgramiv,
    GetProgramInfoLog,
    UseProgram,
    GetUniformLocation,
    Uniform1i,
    UniformMatrix4fv,
    GetIntegerv,
    GetString,
    GetError,
    ActiveTexture,
    BindTexture,
    IsEnabled,
    Enable,
    Disable,
    BlendFuncSeparate,
    GenBuffers,
    DeleteBuffers,
    BindBuffer,
    BufferData,
    BufferSubData,
    GetVertexAttribiv,
    GetVertexAttribPointerv,
    EnableVertexAttribArray,
    DisableVertexAttribArray,
    VertexAttribPointer,
    DrawArrays,
}

/// Proof that every required entry point has been resolved. It can only be obtained
/// from `EntryPoints::load_with`, and is owned by the `GLVisitor` built from it.
#[derive(Debug)]
pub struct EntryPoints {
    _private: (),
}

impl EntryPoints {
    /// Resolves the GL entry points with `loader`, which is usually backed by
    /// `SDL_GL_GetProcAddress`. Fails once with all the missing names if any of the
    /// required entry points is unavailable.
    ///
    /// *Safety*: the OpenGL context must be current in the thread.
    pub unsafe fn load_with<F>(loader: F) -> Result<EntryPoints>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);

        let missing = missing_entry_points();
        if !missing.is_empty() {
            return Err(Error::Requirement(missing.join(", ")).into());
        }

        Ok(EntryPoints { _private: () })
    }
}

/// Represents the capabilities of the context.
///
/// Contrary to the state, these values never change.
#[derive(Debug)]
pub struct Capabilities {
    /// Returns a version or release number. Vendor-specific information may follow the version
    /// number.
    pub version: Version,

    /// The company responsible for this GL implementation.
    pub vendor: String,

    /// The name of the renderer. This name is typically specific to a particular
    /// configuration of a hardware platform.
    pub renderer: String,
}

impl Capabilities {
    pub unsafe fn parse(_: &EntryPoints) -> Result<Capabilities> {
        let version = Version::parse(&Capabilities::parse_str(gl::VERSION)?)?;

        let shader_objects = match version {
            Version::GL(major, _) | Version::ES(major, _) => major >= 2,
        };

        if !shader_objects {
            return Err(Error::Requirement(format!("shader objects ({:?})", version)).into());
        }

        Ok(Capabilities {
            version,
            vendor: Capabilities::parse_str(gl::VENDOR)?,
            renderer: Capabilities::parse_str(gl::RENDERER)?,
        })
    }

    #[inline]
    unsafe fn parse_str(id: GLenum) -> Result<String> {
        let s = gl::GetString(id);
        if s.is_null() {
            bail!("[GL] String of {} is null.", id);
        }

        String::from_utf8(ffi::CStr::from_ptr(s as *const _).to_bytes().to_vec())
            .map_err(|_| format_err!("[GL] String of {} is unformaled.", id))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_version() {
        assert_eq!(
            Version::parse("4.6.0 NVIDIA 535.54.03").unwrap(),
            Version::GL(4, 6)
        );
        assert_eq!(
            Version::parse("OpenGL ES 3.2 Mesa 23.1.4").unwrap(),
            Version::ES(3, 2)
        );
        assert_eq!(
            Version::parse("OpenGL ES-CM 1.1").unwrap(),
            Version::ES(1, 1)
        );
        assert_eq!(Version::parse("OpenGL ES 2.0").unwrap(), Version::ES(2, 0));
        assert!(Version::parse("OpenGL ES-CM").is_err());
        assert!(Version::parse("OpenGL ES").is_err());
        assert!(Version::parse("").is_err());
        assert!(Version::parse("unknown").is_err());
    }

    #[test]
    fn compare_versions() {
        assert!(Version::GL(3, 3) > Version::GL(2, 1));
        assert!(Version::GL(2, 0) < Version::GL(2, 1));
        assert_eq!(Version::GL(3, 0).partial_cmp(&Version::ES(3, 0)), None);
    }

    // Everything touching the global function table stays in this single test, tests
    // run in parallel.
    #[test]
    fn load_entry_points() {
        unsafe {
            let err = EntryPoints::load_with(|_| ::std::ptr::null()).unwrap_err();
            match err.downcast_ref::<Error>() {
                Some(Error::Requirement(missing)) => {
                    for name in REQUIRED_ENTRY_POINTS {
                        assert!(missing.contains(name));
                    }
                }
                _ => panic!("unexpected error {}", err),
            }

            let err = EntryPoints::load_with(|symbol| {
                if symbol.starts_with("glDrawArrays") {
                    ::std::ptr::null()
                } else {
                    1usize as *const c_void
                }
            })
            .unwrap_err();

            match err.downcast_ref::<Error>() {
                Some(Error::Requirement(missing)) => assert_eq!(missing, "glDrawArrays"),
                _ => panic!("unexpected error {}", err),
            }
        }
    }
}
